//! Routes incoming updates to the bot's conversation handlers.

use std::sync::Arc;

use imeibot_core::{
  checker::CheckService,
  lookup::{Lookup, LookupError},
  store::{LookupCache, UserStore},
};
use teloxide::types::{
  CallbackQuery, ChatId, InlineKeyboardMarkup, Message, Update, UpdateKind, User,
};
use tracing::{debug, info, warn};

use crate::{Error, Result, api::Messenger, format};

/// Holds everything a handler needs. Cheap to clone.
pub struct Dispatcher<S, C, M> {
  lookup:    Lookup<S, C>,
  messenger: Arc<M>,
  admins:    Arc<[i64]>,
}

impl<S, C, M> Clone for Dispatcher<S, C, M> {
  fn clone(&self) -> Self {
    Self {
      lookup:    self.lookup.clone(),
      messenger: Arc::clone(&self.messenger),
      admins:    Arc::clone(&self.admins),
    }
  }
}

impl<S, C, M> Dispatcher<S, C, M>
where
  S: LookupCache + UserStore,
  C: CheckService,
  M: Messenger,
{
  pub fn new(lookup: Lookup<S, C>, messenger: Arc<M>, admins: Vec<i64>) -> Self {
    Self {
      lookup,
      messenger,
      admins: admins.into(),
    }
  }

  pub fn is_admin(&self, tg_id: i64) -> bool { self.admins.contains(&tg_id) }

  fn users(&self) -> &S { self.lookup.cache() }

  /// Handle one update. Anything but a message or a callback is ignored.
  pub async fn dispatch(&self, update: Update) -> Result<()> {
    match update.kind {
      UpdateKind::Message(msg) => self.on_message(msg).await,
      UpdateKind::CallbackQuery(cq) => self.on_callback(cq).await,
      _ => {
        debug!(update_id = update.id.0, "ignoring update without message or callback");
        Ok(())
      }
    }
  }

  // ─── Messages ──────────────────────────────────────────────────────────────

  async fn on_message(&self, msg: Message) -> Result<()> {
    let chat_id = msg.chat.id;
    let (Some(tg_id), Some(text)) = (msg.from.as_ref().and_then(user_id), msg.text()) else {
      debug!(chat_id = chat_id.0, "ignoring message without sender or text");
      return Ok(());
    };
    let text = text.trim();

    if text.split_whitespace().next() == Some("/start") {
      return self.on_start(chat_id, tg_id).await;
    }

    if !self.may_use_bot(tg_id).await? {
      return self.send(chat_id, format::ACCESS_DENIED, None).await;
    }

    match self.lookup.lookup(text).await {
      Ok(record) => self.send(chat_id, format::lookup_result(&record), None).await,
      Err(LookupError::InvalidIdentifier(_)) => {
        self.send(chat_id, format::INVALID_IMEI, None).await
      }
      Err(LookupError::LookupFailed(e)) => {
        warn!(tg_id, error = %e, "lookup failed");
        self.send(chat_id, format::SERVICE_UNAVAILABLE, None).await
      }
      Err(e @ LookupError::Store(_)) => {
        self.send(chat_id, format::INTERNAL_ERROR, None).await?;
        Err(e.into())
      }
    }
  }

  async fn on_start(&self, chat_id: ChatId, tg_id: i64) -> Result<()> {
    let user = self.users().register(tg_id).await.map_err(store_error)?;
    info!(tg_id, is_active = user.is_active, "user started the bot");

    if self.is_admin(tg_id) {
      let (text, kb) = format::admin_menu();
      self.send(chat_id, text, Some(kb)).await
    } else if user.is_active {
      self.send(chat_id, format::ASK_FOR_IMEI, None).await
    } else {
      self.send(chat_id, format::ACCESS_DENIED, None).await
    }
  }

  async fn may_use_bot(&self, tg_id: i64) -> Result<bool> {
    if self.is_admin(tg_id) {
      return Ok(true);
    }
    let user = self.users().get_user(tg_id).await.map_err(store_error)?;
    Ok(user.is_some_and(|u| u.is_active))
  }

  // ─── Callbacks ─────────────────────────────────────────────────────────────

  /// The query is answered even when handling fails, so the button stops
  /// spinning on the client.
  async fn on_callback(&self, cq: CallbackQuery) -> Result<()> {
    let handled = self.handle_callback(&cq).await;
    let answered = self
      .messenger
      .answer_callback_query(cq.id)
      .await
      .map_err(messenger_error);
    handled.and(answered)
  }

  async fn handle_callback(&self, cq: &CallbackQuery) -> Result<()> {
    let Some(tg_id) = user_id(&cq.from).filter(|id| self.is_admin(*id)) else {
      warn!(from = cq.from.id.0, "callback from non-admin ignored");
      return Ok(());
    };

    let chat_id = cq.message.as_ref().map_or(ChatId(tg_id), |m| m.chat().id);
    let data = cq.data.as_deref().unwrap_or_default();

    if data == format::CALLBACK_USER_LIST {
      return self.send_user_list(chat_id).await;
    }

    if let Some(target) = data.strip_prefix(format::CALLBACK_TOGGLE_PREFIX) {
      let target: i64 = target
        .parse()
        .map_err(|_| Error::BadCallback(data.to_owned()))?;
      self.toggle_user(target).await?;
      return self.send_user_list(chat_id).await;
    }

    debug!(data, "unknown callback data");
    Ok(())
  }

  async fn toggle_user(&self, tg_id: i64) -> Result<()> {
    let current = self.users().get_user(tg_id).await.map_err(store_error)?;
    let is_active = !current.is_some_and(|u| u.is_active);
    let user = self
      .users()
      .set_active(tg_id, is_active)
      .await
      .map_err(store_error)?;
    info!(tg_id, is_active = user.is_active, "user activation toggled");

    let notice = if user.is_active {
      format::ACCESS_GRANTED_NOTICE
    } else {
      format::ACCESS_REVOKED_NOTICE
    };
    // The user may never have opened a chat with the bot.
    if let Err(e) = self.send(ChatId(tg_id), notice, None).await {
      warn!(tg_id, error = %e, "could not notify user");
    }
    Ok(())
  }

  async fn send_user_list(&self, chat_id: ChatId) -> Result<()> {
    let users = self.users().list_users().await.map_err(store_error)?;
    let (text, kb) = format::user_list(&users);
    self.send(chat_id, text, kb).await
  }

  async fn send(
    &self,
    chat_id: ChatId,
    text: impl Into<String>,
    keyboard: Option<InlineKeyboardMarkup>,
  ) -> Result<()> {
    self
      .messenger
      .send_message(chat_id, text.into(), keyboard)
      .await
      .map_err(messenger_error)
  }
}

/// Telegram ids are stored signed; ids that do not fit are treated as unknown.
fn user_id(user: &User) -> Option<i64> { i64::try_from(user.id.0).ok() }

fn store_error<E: std::error::Error + Send + Sync + 'static>(e: E) -> Error {
  Error::Store(Box::new(e))
}

fn messenger_error<E: std::error::Error + Send + Sync + 'static>(e: E) -> Error {
  Error::Messenger(Box::new(e))
}
