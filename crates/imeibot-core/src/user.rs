//! Bot users and their activation flag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A Telegram account that has talked to the bot.
///
/// New users start inactive; an administrator activates them through the
/// admin menu or `POST /api/vite-list/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub tg_id:      i64,
  pub is_active:  bool,
  pub created_at: DateTime<Utc>,
}
