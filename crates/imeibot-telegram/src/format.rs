//! Reply texts and the admin keyboards.

use imeibot_core::{record::LookupRecord, user::User};
use serde_json::Value;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

pub const ASK_FOR_IMEI: &str = "Отправьте IMEI устройства для проверки.";
pub const ACCESS_DENIED: &str =
  "Доступ к боту ограничен. Обратитесь к администратору.";
pub const INVALID_IMEI: &str =
  "Некорректный IMEI: нужно 15 цифр с верной контрольной цифрой.";
pub const SERVICE_UNAVAILABLE: &str =
  "Сервис проверки IMEI временно недоступен, попробуйте позже.";
pub const INTERNAL_ERROR: &str = "Внутренняя ошибка, попробуйте позже.";
pub const ADMIN_MENU: &str = "Панель администратора.";
pub const EMPTY_USER_LIST: &str = "Список пользователей пуст.";
pub const ACCESS_GRANTED_NOTICE: &str = "Вам открыт доступ к боту.";
pub const ACCESS_REVOKED_NOTICE: &str = "Ваш доступ к боту закрыт.";

/// Callback data of the admin menu's "users" button.
pub const CALLBACK_USER_LIST: &str = "add_user";
/// Prefix of the per-user activation toggle callbacks.
pub const CALLBACK_TOGGLE_PREFIX: &str = "is_block+";

fn status_mark(is_active: bool) -> &'static str {
  if is_active { "✅" } else { "❌" }
}

pub fn admin_menu() -> (String, InlineKeyboardMarkup) {
  let kb = InlineKeyboardMarkup::new([[InlineKeyboardButton::callback(
    "Пользователи",
    CALLBACK_USER_LIST,
  )]]);
  (ADMIN_MENU.to_string(), kb)
}

/// Numbered user list plus one toggle button per user.
pub fn user_list(users: &[User]) -> (String, Option<InlineKeyboardMarkup>) {
  if users.is_empty() {
    return (EMPTY_USER_LIST.to_string(), None);
  }

  let mut text = String::from("Список пользователей:");
  for (n, user) in users.iter().enumerate() {
    text.push_str(&format!(
      "\n{}. {}. {}",
      n + 1,
      user.tg_id,
      status_mark(user.is_active)
    ));
  }

  let kb = InlineKeyboardMarkup::new(users.iter().map(|u| {
    [InlineKeyboardButton::callback(
      format!("{} {}", u.tg_id, status_mark(u.is_active)),
      format!("{CALLBACK_TOGGLE_PREFIX}{}", u.tg_id),
    )]
  }));

  (text, Some(kb))
}

/// Human-readable lookup result.
pub fn lookup_result(record: &LookupRecord) -> String {
  let p = &record.payload.properties;
  let mut lines = vec![format!("IMEI: {}", record.imei)];

  let known = [
    ("Устройство", &p.device_name),
    ("MEID", &p.meid),
    ("IMEI2", &p.imei2),
    ("Серийный номер", &p.serial),
  ];
  for (label, value) in known {
    if let Some(v) = value {
      lines.push(format!("{label}: {v}"));
    }
  }

  for (key, value) in &p.extra {
    let shown = match value {
      Value::String(s) => s.clone(),
      Value::Null => continue,
      other => other.to_string(),
    };
    lines.push(format!("{key}: {shown}"));
  }

  lines.join("\n")
}
