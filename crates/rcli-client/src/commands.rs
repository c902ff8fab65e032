//! Convenience wrappers for individual daemon subcommands.

use std::fmt;

use serde_json::Value;

use crate::client::Invoke;
use crate::{ClientError, CommandRequest};

/// Identifier of a container as printed by the daemon.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerId(String);

impl ContainerId {
    /// Wraps an identifier, trimming surrounding whitespace.
    #[must_use]
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().trim().to_owned())
    }

    /// Identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper, returning the identifier text.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for ContainerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Container subcommands expressed as argument lists over [`Invoke`].
///
/// Implemented for every invoker, so the same wrappers drive a real
/// [`Client`](crate::Client) and any test double.
pub trait ContainerCommands: Invoke {
    /// Blocks until the container exits, returning the daemon's output.
    fn wait(&self, container: &str) -> Result<String, ClientError> {
        self.invoke_simple(&CommandRequest::new(["wait", container]))
            .map(crate::Response::into_text)
    }

    /// Kills a running container.
    fn kill(&self, container: &str) -> Result<String, ClientError> {
        self.invoke_simple(&CommandRequest::new(["kill", container]))
            .map(crate::Response::into_text)
    }

    /// Removes an image.
    fn remove_image(&self, image: &str) -> Result<String, ClientError> {
        self.invoke_simple(&CommandRequest::new(["rmi", image]))
            .map(crate::Response::into_text)
    }

    /// Identifiers of all running containers, in the daemon's order.
    fn list_running_containers(&self) -> Result<Vec<ContainerId>, ClientError> {
        let response = self.invoke_simple(&CommandRequest::new(["ps", "-q"]))?;
        Ok(response
            .text()
            .trim()
            .lines()
            .map(ContainerId::new)
            .collect())
    }

    /// Creates and starts a detached container, returning its identifier.
    fn run(
        &self,
        options: &[String],
        image: &str,
        command: &[String],
    ) -> Result<ContainerId, ClientError> {
        let request = run_request(&["run", "-d"], options, image, command);
        let response = self.invoke_simple(&request)?;
        Ok(ContainerId::new(response.text().trim_end()))
    }

    /// Creates and starts a container with `stdin` attached to its standard
    /// input, returning its identifier.
    fn run_with_stdin(
        &self,
        options: &[String],
        image: &str,
        stdin: &str,
        command: &[String],
    ) -> Result<ContainerId, ClientError> {
        let request = run_request(&["run", "-i", "-a", "stdin"], options, image, command);
        let response = self.invoke(&request, Some(stdin))?;
        Ok(ContainerId::new(response.text().trim_end()))
    }

    /// Low-level details of a container or image as parsed JSON.
    fn inspect(&self, subject: &str) -> Result<Value, ClientError> {
        let response = self.invoke_simple(&CommandRequest::new(["inspect", subject]))?;
        serde_json::from_str(response.text()).map_err(|source| ClientError::DecodeInspect {
            subject: subject.to_owned(),
            source,
        })
    }

    /// Commits a container's filesystem as `new_image`, returning the daemon's
    /// trimmed output (the new image identifier).
    fn commit(
        &self,
        container: &str,
        new_image: &str,
        comment: &str,
    ) -> Result<String, ClientError> {
        let request = CommandRequest::new(["commit", "-m", comment, container, new_image]);
        let response = self.invoke_simple(&request)?;
        Ok(response.text().trim().to_owned())
    }
}

impl<T: Invoke + ?Sized> ContainerCommands for T {}

fn run_request(
    prefix: &[&str],
    options: &[String],
    image: &str,
    command: &[String],
) -> CommandRequest {
    CommandRequest::new(
        prefix
            .iter()
            .copied()
            .chain(options.iter().map(String::as_str))
            .chain(std::iter::once(image))
            .chain(command.iter().map(String::as_str)),
    )
}
