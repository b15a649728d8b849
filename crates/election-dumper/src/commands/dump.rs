//! CSV export of one election result.
//!
//! Columns, one row per vote, delegates in result order:
//! `voter, startTime, duration, decay, tokens, votes, votee, voterIoAddr`

use crate::address::io_address;
use anyhow::{bail, Context, Result};
use chrono::SecondsFormat;
use election_committee::{ElectionResult, ResultSource, Vote};
use election_rpc::{EpochMetaProvider, HttpEpochMetaProvider, HttpResultSource};
use std::io;
use std::time::Duration;
use tracing::{info, warn};

pub const CSV_HEADER: [&str; 8] = [
    "voter",
    "startTime",
    "duration",
    "decay",
    "tokens",
    "votes",
    "votee",
    "voterIoAddr",
];

#[derive(Debug, Clone)]
pub struct DumpArgs {
    pub config_paths: Vec<String>,
    pub epoch: u64,
    pub height: u64,
    pub endpoint: Option<String>,
}

/// Execute a dump: config → height → result → CSV on stdout.
pub async fn run(args: DumpArgs) -> Result<()> {
    let path_refs: Vec<&str> = args.config_paths.iter().map(|s| s.as_str()).collect();
    let (loaded, cfg) =
        election_config::load_dumper_config(&path_refs).context("failed to load config file")?;
    info!(config_hash = %loaded.config_hash, "config loaded");

    let endpoint = args.endpoint.unwrap_or_else(|| cfg.endpoint.clone());
    let epochs = HttpEpochMetaProvider::new(endpoint);
    let height = resolve_height(&epochs, args.epoch, args.height).await?;

    if !cfg.committee.is_on_grid(height) {
        bail!(
            "height {} is not a committee height (start {}, interval {})",
            height,
            cfg.committee.gravity_chain_start_height,
            cfg.committee.gravity_chain_height_interval
        );
    }

    let results = HttpResultSource::new(cfg.result_api.clone());
    let rows = export(&results, height, io::stdout()).await?;
    info!(height, rows, "dump complete");
    Ok(())
}

/// `--epoch` wins over `--height`; at least one must be set.
pub async fn resolve_height(
    epochs: &dyn EpochMetaProvider,
    epoch: u64,
    height: u64,
) -> Result<u64> {
    if epoch != 0 {
        if height != 0 {
            warn!(epoch, height, "--height ignored because --epoch is set");
        }
        let meta = epochs
            .fetch_epoch_meta(epoch)
            .await
            .context("failed to get epoch meta")?;
        info!(
            epoch,
            height = meta.gravity_chain_start_height,
            source = epochs.source_name(),
            "resolved epoch"
        );
        return Ok(meta.gravity_chain_start_height);
    }
    if height == 0 {
        bail!("either --epoch or --height must be set");
    }
    Ok(height)
}

/// Fetch the result at `height` from `source` and stream it as CSV.
pub async fn export<W: io::Write>(
    source: &dyn ResultSource,
    height: u64,
    out: W,
) -> Result<usize> {
    let result = source
        .fetch_result_by_height(height)
        .await
        .with_context(|| format!("failed to fetch result height={height}"))?;
    info!(
        height,
        source = source.source_name(),
        delegates = result.delegates().len(),
        "fetched result"
    );
    write_votes_csv(&result, out)
}

/// Write the header plus one row per vote. Returns the number of vote rows.
pub fn write_votes_csv<W: io::Write>(result: &ElectionResult, out: W) -> Result<usize> {
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(CSV_HEADER)
        .context("error writing header to csv")?;

    let mut rows = 0usize;
    for delegate in result.delegates() {
        for vote in result.votes_by_delegate(delegate.name()) {
            writer
                .write_record(vote_row(vote))
                .context("error writing record to csv")?;
            rows += 1;
        }
    }
    writer.flush().context("error flushing csv")?;
    Ok(rows)
}

fn vote_row(vote: &Vote) -> [String; 8] {
    [
        hex::encode(&vote.voter),
        vote.start_time.to_rfc3339_opts(SecondsFormat::Secs, true),
        format_duration(vote.duration),
        vote.decay.to_string(),
        vote.amount.clone(),
        vote.weighted_amount.clone(),
        vote.candidate.clone(),
        io_address(&vote.voter).unwrap_or_default(),
    ]
}

/// `336h0m0s`, `5m3s`, `7s`, `0s`; sub-second precision is dropped.
fn format_duration(d: Duration) -> String {
    let total = d.as_secs();
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{h}h{m}m{s}s")
    } else if m > 0 {
        format!("{m}m{s}s")
    } else {
        format!("{s}s")
    }
}
