pub mod llm;
pub mod messages;
pub mod supervisor;
pub mod traits;

pub use llm::LlmActorHandle;
pub use supervisor::SupervisorHandle;
pub use traits::LlmActor;
