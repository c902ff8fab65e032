//! Image manipulation composed from container subcommands.

use tracing::info;

use crate::ClientError;
use crate::client::CLIENT_TARGET;
use crate::commands::ContainerCommands;

/// Creates `new_image` from `base_image` with `contents` written to `path`.
///
/// A container is started from `base_image` with `contents` on its standard
/// input, running a shell that stores the input at `path` and echoes it back.
/// Once the container exits its filesystem is committed as `new_image`.
/// Returns the daemon's output for the commit. Any failing step aborts the
/// whole operation with that step's error; nothing is cleaned up.
pub fn extend_image_with_file<I>(
    invoker: &I,
    base_image: &str,
    new_image: &str,
    path: &str,
    contents: &str,
) -> Result<String, ClientError>
where
    I: ContainerCommands + ?Sized,
{
    let quoted = shell_quote(path);
    let script = format!("cat > {quoted}; cat {quoted}");
    let command = [String::from("/bin/sh"), String::from("-c"), script];

    let container = invoker.run_with_stdin(&[], base_image, contents, &command)?;
    invoker.wait(container.as_str())?;
    let image = invoker.commit(container.as_str(), new_image, &format!("Added {path}"))?;
    info!(
        target: CLIENT_TARGET,
        base_image,
        new_image,
        path,
        %container,
        "extended image with file"
    );
    Ok(image)
}

/// Quotes `value` for a POSIX shell as a single word.
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
