use anyhow::Context;
use tracing::{Instrument, info_span};

use mnat_common::error::RunError;
use mnat_common::report::ScanResult;
use mnat_core::ScanOrchestrator;

use crate::commands::CommandLine;
use crate::terminal::{print, progress::ResolutionBar};

pub async fn scan(args: &CommandLine) -> anyhow::Result<()> {
    let cfg = args.config();
    let target = args.output_target();

    let bar = ResolutionBar::new();
    let orchestrator = ScanOrchestrator::from_config(&cfg).on_resolved(bar.callback());

    print::header("starting scanner");
    let outcome = orchestrator
        .run(&args.netip, args.subnet, target.as_ref())
        .instrument(info_span!("mnat", netip = %args.netip, subnet = args.subnet))
        .await;
    bar.finish();

    match outcome {
        Ok(result) => {
            report(&result);
            Ok(())
        }
        Err(RunError::Persist { result, source }) => {
            report(&result);
            Err(source).context("scan finished but the results could not be saved")
        }
        Err(err) => Err(err).context("scan failed"),
    }
}

fn report(result: &ScanResult) {
    if !result.found {
        print::header("zero devices detected");
        print::no_results();
        return;
    }

    print::header("discovered devices");
    print::device_table(&result.devices);
    print::summary(result.devices.len(), result.duration);

    if let Some(path) = &result.saved_to {
        print::saved_to(path);
    }
}
