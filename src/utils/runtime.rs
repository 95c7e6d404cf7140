use anyhow::Result;

/// Runtime for the tracker binary, a tick is short and does a couple of file operations.
pub fn single_thread_runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
