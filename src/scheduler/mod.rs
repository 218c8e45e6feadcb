pub mod engine;
pub mod pipeline;
pub mod simulation;

pub use engine::{Scheduler, SchedulerConfig};
pub use pipeline::{default_stages, load_stages, PipelineStage, StageResult};
pub use simulation::SimulationCommand;
