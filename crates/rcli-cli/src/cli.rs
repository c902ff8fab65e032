//! Command-line argument definitions for `rcli`.

use clap::{Parser, Subcommand};

/// Command-line interface for the daemon's remote command protocol.
#[derive(Parser, Debug)]
#[command(name = "rcli", disable_help_subcommand = true)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

/// Operations exposed by `rcli`.
#[derive(Subcommand, Debug, Clone)]
pub(crate) enum CliCommand {
    /// Sends a raw subcommand and prints the daemon's output.
    Exec {
        /// Forwards this process's standard input to the invoked command.
        #[arg(long)]
        stdin: bool,
        /// Subcommand name followed by its arguments.
        #[arg(
            value_name = "ARG",
            required = true,
            num_args = 1..,
            trailing_var_arg = true,
            allow_hyphen_values = true
        )]
        arguments: Vec<String>,
    },
    /// Lists identifiers of running containers.
    Ps,
    /// Blocks until a container exits.
    Wait {
        /// Container identifier.
        container: String,
    },
    /// Kills a running container.
    Kill {
        /// Container identifier.
        container: String,
    },
    /// Removes an image.
    Rmi {
        /// Image name or identifier.
        image: String,
    },
    /// Prints low-level details of a container or image as JSON.
    Inspect {
        /// Container or image identifier.
        subject: String,
    },
    /// Commits a container's filesystem as a new image.
    Commit {
        /// Container identifier.
        container: String,
        /// Name of the image to create.
        image: String,
        /// Commit message.
        #[arg(short, long)]
        message: String,
    },
    /// Creates and starts a detached container, printing its identifier.
    Run {
        /// Extra option passed to the daemon's `run` (repeatable).
        #[arg(short = 'o', long = "option", value_name = "OPTION", allow_hyphen_values = true)]
        options: Vec<String>,
        /// Image to start the container from.
        image: String,
        /// Command to run inside the container.
        #[arg(
            value_name = "COMMAND",
            num_args = 0..,
            trailing_var_arg = true,
            allow_hyphen_values = true
        )]
        command: Vec<String>,
    },
    /// Creates a new image by writing standard input to a file in a base image.
    ExtendImage {
        /// Image to start from.
        base_image: String,
        /// Name of the image to create.
        new_image: String,
        /// Absolute path of the file inside the image.
        path: String,
    },
}
