mod chat;
mod health_check;
mod subscriptions;
mod unsubscribe;

pub use chat::handle_chat_message;
pub use health_check::health_check;
pub use subscriptions::handle_subscribe;
pub use unsubscribe::handle_unsubscribe;

/// Writes the full source chain of an error, one cause per line. Used by the
/// endpoint error types' Debug impls so logs show the whole story.
pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();

    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }

    Ok(())
}
