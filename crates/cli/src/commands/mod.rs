pub mod feedback;
pub mod history;
pub mod knowledge;
pub mod review;

pub use feedback::FeedbackCommand;
pub use history::{HistoryCommand, ShowCommand};
pub use knowledge::KnowledgeCommand;
pub use review::ReviewCommand;
