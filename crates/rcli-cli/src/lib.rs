//! Command-line runtime for the remote command client.
//!
//! The runtime splits configuration flags from the command, loads layered
//! configuration, installs diagnostics, and dispatches the command through
//! [`rcli_client`]. IO streams and the configuration loader are injectable so
//! the runtime can be exercised from tests without a terminal.

use std::ffi::OsString;
use std::io::{Read, Write};
use std::process::ExitCode;

use clap::Parser;
use rcli_client::{Client, CommandRequest, ContainerCommands, extend_image_with_file};
use tracing::debug;

mod cli;
mod config;
mod errors;
mod telemetry;

use cli::{Cli, CliCommand};
pub(crate) use config::{ConfigLoader, OrthoConfigLoader, split_config_arguments};
pub(crate) use errors::AppError;

const CLI_TARGET: &str = "rcli::cli";

/// Bundles the IO streams provided to the CLI runtime.
pub(crate) struct IoStreams<'a, R: Read, W: Write, E: Write> {
    pub(crate) stdin: &'a mut R,
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
}

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, R, W, E>(args: I, stdin: &mut R, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    R: Read,
    W: Write,
    E: Write,
{
    let mut io = IoStreams {
        stdin,
        stdout,
        stderr,
    };
    run_with_loader(args, &mut io, &OrthoConfigLoader)
}

/// Runs the CLI with a custom configuration loader.
pub(crate) fn run_with_loader<I, R, W, E, L>(
    args: I,
    io: &mut IoStreams<'_, R, W, E>,
    loader: &L,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    R: Read,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    match try_run(args, io, loader) {
        Ok(()) => ExitCode::SUCCESS,
        Err(AppError::CliUsage(error)) if !error.use_stderr() => {
            let _ = write!(io.stdout, "{error}");
            ExitCode::SUCCESS
        }
        Err(AppError::CliUsage(error)) => {
            let _ = write!(io.stderr, "{error}");
            ExitCode::from(2)
        }
        Err(error) => {
            let _ = writeln!(io.stderr, "{error}");
            ExitCode::FAILURE
        }
    }
}

fn try_run<I, R, W, E, L>(
    args: I,
    io: &mut IoStreams<'_, R, W, E>,
    loader: &L,
) -> Result<(), AppError>
where
    I: IntoIterator<Item = OsString>,
    R: Read,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    let args: Vec<OsString> = args.into_iter().collect();
    let split = split_config_arguments(&args);
    let cli = Cli::try_parse_from(split.command_arguments).map_err(AppError::CliUsage)?;
    let config = loader.load(&split.config_arguments)?;
    telemetry::initialise(&config)?;
    let client = Client::from_config(&config);
    debug!(target: CLI_TARGET, endpoint = %client.endpoint(), "dispatching command");
    execute(&client, cli.command, io)
}

fn execute<C, R, W, E>(
    client: &C,
    command: CliCommand,
    io: &mut IoStreams<'_, R, W, E>,
) -> Result<(), AppError>
where
    C: ContainerCommands + ?Sized,
    R: Read,
    W: Write,
    E: Write,
{
    match command {
        CliCommand::Exec { stdin, arguments } => {
            let input = if stdin {
                Some(read_stdin(io.stdin)?)
            } else {
                None
            };
            let response = client.invoke(&CommandRequest::new(arguments), input.as_deref())?;
            if response.is_closed_before_handshake() {
                debug!(target: CLI_TARGET, "daemon closed the connection before responding");
            }
            io.stdout
                .write_all(response.text().as_bytes())
                .map_err(AppError::WriteOutput)?;
        }
        CliCommand::Ps => {
            for container in client.list_running_containers()? {
                writeln!(io.stdout, "{container}").map_err(AppError::WriteOutput)?;
            }
        }
        CliCommand::Wait { container } => write_raw(io.stdout, &client.wait(&container)?)?,
        CliCommand::Kill { container } => write_raw(io.stdout, &client.kill(&container)?)?,
        CliCommand::Rmi { image } => write_raw(io.stdout, &client.remove_image(&image)?)?,
        CliCommand::Inspect { subject } => {
            let details = client.inspect(&subject)?;
            serde_json::to_writer_pretty(&mut *io.stdout, &details)
                .map_err(AppError::RenderInspect)?;
            writeln!(io.stdout).map_err(AppError::WriteOutput)?;
        }
        CliCommand::Commit {
            container,
            image,
            message,
        } => {
            let created = client.commit(&container, &image, &message)?;
            writeln!(io.stdout, "{created}").map_err(AppError::WriteOutput)?;
        }
        CliCommand::Run {
            options,
            image,
            command,
        } => {
            let container = client.run(&options, &image, &command)?;
            writeln!(io.stdout, "{container}").map_err(AppError::WriteOutput)?;
        }
        CliCommand::ExtendImage {
            base_image,
            new_image,
            path,
        } => {
            let contents = read_stdin(io.stdin)?;
            let created = extend_image_with_file(client, &base_image, &new_image, &path, &contents)?;
            writeln!(io.stdout, "{created}").map_err(AppError::WriteOutput)?;
        }
    }
    io.stdout.flush().map_err(AppError::WriteOutput)
}

fn read_stdin<R: Read>(stdin: &mut R) -> Result<String, AppError> {
    let mut input = String::new();
    stdin
        .read_to_string(&mut input)
        .map_err(AppError::ReadStdin)?;
    Ok(input)
}

fn write_raw<W: Write>(stdout: &mut W, text: &str) -> Result<(), AppError> {
    stdout
        .write_all(text.as_bytes())
        .map_err(AppError::WriteOutput)
}
