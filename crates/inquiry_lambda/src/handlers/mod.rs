pub mod dispatch;
pub mod intake;
