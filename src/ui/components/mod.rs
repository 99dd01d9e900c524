mod confirm;
mod filter_input;
mod form;
mod input;
mod key_result;
mod notification;

pub use confirm::{ConfirmDialog, ConfirmEvent};
pub use filter_input::{FilterEvent, FilterInput};
pub use form::{FormEvent, FormMode, FormTick, UserForm};
pub use input::{InputResult, TextInput};
pub use key_result::KeyResult;
pub use notification::{Notification, NotificationLevel, Notifications};
