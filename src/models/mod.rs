pub mod booking;
pub mod directive;
pub mod notification;
pub mod session;
pub mod tool;

pub use booking::{BookingRecord, BookingState};
pub use directive::Directive;
pub use notification::{ConfirmationMessage, DispatchStatus};
pub use session::SessionSnapshot;
pub use tool::{Operation, ToolCall};
