use std::future::Future;

use crate::error::ConveyorResult;

/// Trait for background workers in the pipeline.
///
/// Workers return handles that can be used to wait for completion. The
/// generic parameter `H` represents the handle type returned when the worker
/// starts.
pub trait Worker<H>
where
    H: WorkerHandle,
{
    /// Starts the worker and returns a handle for monitoring its execution.
    ///
    /// This method begins background processing and returns immediately with
    /// a handle that can be used to wait for completion.
    fn start(self) -> impl Future<Output = ConveyorResult<H>> + Send;
}

/// Handle for waiting on a running worker.
///
/// A worker's exit is observed only through its handle's completion; no
/// error ever propagates across a worker boundary any other way.
pub trait WorkerHandle {
    /// Value the worker resolves to once joined.
    type Output;

    /// Waits for the worker to complete and returns the final result.
    ///
    /// The handle is consumed by this operation. Worker panics surface here
    /// as errors rather than taking the process down.
    fn wait(self) -> impl Future<Output = ConveyorResult<Self::Output>> + Send;
}
