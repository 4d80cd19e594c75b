//! N-stage pipe execution.

use std::io::{self, PipeReader, PipeWriter};
use std::process::Stdio;

use log::{debug, info, warn};

use super::StageReport;
use super::spawn::{Launch, spawn};
use super::stdio::{SavedStdio, open_input, open_output, redirect_stdin};
use crate::error::ShellError;
use crate::parse::{Command, Pipeline};

/// Run every stage of `pipeline` and collect one report per stage.
///
/// The parent's standard input and output are saved first and restored on
/// every exit path. A stage exiting non-zero is not an error; with
/// `report_nonzero` set its pid and status are printed.
pub(crate) fn run(pipeline: &Pipeline, report_nonzero: bool) -> Result<Vec<StageReport>, ShellError> {
    let saved = SavedStdio::save()?;
    let result = run_stages(pipeline, report_nonzero);
    let restored = saved.restore();
    let reports = result?;
    restored?;
    Ok(reports)
}

fn run_stages(
    pipeline: &Pipeline,
    report_nonzero: bool,
) -> Result<Vec<StageReport>, ShellError> {
    let stages = pipeline.stages();

    // All pipes exist before the first child; every end is created close-on-exec
    // so a child only ever holds the two ends it was given.
    let (mut readers, mut writers) = open_pipes(pipeline.pipe_count())?;
    debug!("allocated {} pipe(s)", readers.len());

    if let Some(path) = pipeline.first().and_then(|c| c.input.as_deref()) {
        redirect_stdin(open_input(path)?)?;
    }
    let mut output = pipeline
        .last()
        .and_then(|c| c.output.as_deref())
        .map(open_output)
        .transpose()?;

    let last = stages.len() - 1;
    let mut launched = Vec::with_capacity(stages.len());
    for (index, stage) in stages.iter().enumerate() {
        let stdin = match index {
            0 => None,
            _ => readers[index - 1].take().map(Stdio::from),
        };
        let stdout = if index == last {
            output.take().map(Stdio::from)
        } else {
            writers[index].take().map(Stdio::from)
        };

        match spawn(&stage.argv, stdin, stdout) {
            Ok(launch) => launched.push(launch),
            Err(err) => {
                warn!("stage {index} failed to start, reaping {} child(ren)", launched.len());
                drop((readers, writers));
                let _ = wait_all(stages, launched, false);
                return Err(err);
            }
        }
    }
    drop((readers, writers));

    let reports = wait_all(stages, launched, report_nonzero)?;
    info!(
        "pipeline of {} stage(s) finished, {} non-zero",
        reports.len(),
        reports.iter().filter(|r| !r.success()).count()
    );
    Ok(reports)
}

type PipeEnds = (Vec<Option<PipeReader>>, Vec<Option<PipeWriter>>);

fn open_pipes(count: usize) -> Result<PipeEnds, ShellError> {
    let pipes = (0..count)
        .map(|_| io::pipe())
        .collect::<io::Result<Vec<_>>>()
        .map_err(ShellError::Pipe)?;
    Ok(pipes
        .into_iter()
        .map(|(reader, writer)| (Some(reader), Some(writer)))
        .unzip())
}

/// Wait for every launched stage in stage order, pairing each pid with its
/// own status. A failed wait does not stop the others from being reaped.
fn wait_all(
    stages: &[Command],
    launched: Vec<Launch>,
    report_nonzero: bool,
) -> Result<Vec<StageReport>, ShellError> {
    let mut reports = Vec::with_capacity(launched.len());
    let mut failure = None;

    for (stage, (command, launch)) in stages.iter().zip(launched).enumerate() {
        match launch.wait() {
            Ok((pid, status)) => {
                let report = StageReport {
                    stage,
                    program: command.program().to_string(),
                    pid,
                    status,
                };
                if report_nonzero && report.is_reportable_failure() {
                    eprintln!("ubash: {report}");
                }
                reports.push(report);
            }
            Err(source) => {
                warn!("wait for stage {stage} failed: {source}");
                failure.get_or_insert(ShellError::Syscall {
                    call: "wait",
                    source,
                });
            }
        }
    }

    match failure {
        Some(err) => Err(err),
        None => Ok(reports),
    }
}
