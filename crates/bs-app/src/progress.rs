/// Pipeline stages, in the order a request passes through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Received,
    Validated,
    ProtocolBuilt,
    CheckingCache,
    LoadingCachedResult,
    Solving,
    Solved,
    SolverFailed,
    Normalized,
    SavingResults,
    Responded,
}

#[derive(Debug, Clone)]
pub struct RunProgressEvent {
    pub stage: RunStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
}

impl RunProgressEvent {
    pub fn stage(stage: RunStage, elapsed_wall_s: f64, message: Option<String>) -> Self {
        Self {
            stage,
            elapsed_wall_s,
            message,
        }
    }
}

impl RunStage {
    pub fn label(self) -> &'static str {
        match self {
            RunStage::Received => "received",
            RunStage::Validated => "validated",
            RunStage::ProtocolBuilt => "protocol built",
            RunStage::CheckingCache => "checking cache",
            RunStage::LoadingCachedResult => "loading cached result",
            RunStage::Solving => "solving",
            RunStage::Solved => "solved",
            RunStage::SolverFailed => "solver failed",
            RunStage::Normalized => "normalized",
            RunStage::SavingResults => "saving results",
            RunStage::Responded => "done",
        }
    }
}
