use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::thread;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use log::{debug, info, warn};

use waste_relay_rs::{
    CategoryMapper, ClassLabels, Clock, DetectionSource, FirebaseSink, ManualClock, MemorySink,
    Publisher, RelayConfig, RelayPipeline, ReplaySource, Sink, SourceError, Stabilizer,
    SystemClock, load_config,
};

const USAGE: &str = "usage:
  waste-relay <config.json> <frames.jsonl | -> [--dry-run] [--realtime]
  waste-relay --check <config.json>";

struct Args {
    config: PathBuf,
    frames: Option<PathBuf>,
    check: bool,
    dry_run: bool,
    realtime: bool,
}

fn parse_args() -> Result<Args> {
    let mut positional = Vec::new();
    let (mut check, mut dry_run, mut realtime) = (false, false, false);
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--check" => check = true,
            "--dry-run" => dry_run = true,
            "--realtime" => realtime = true,
            "-h" | "--help" => bail!("{USAGE}"),
            flag if flag.starts_with("--") => bail!("unknown flag {flag}\n{USAGE}"),
            _ => positional.push(PathBuf::from(&arg)),
        }
    }

    let mut positional = positional.into_iter();
    let Some(config) = positional.next() else {
        bail!("{USAGE}");
    };
    let frames = positional.next();
    if !check && frames.is_none() {
        bail!("missing frames file\n{USAGE}");
    }
    Ok(Args {
        config,
        frames,
        check,
        dry_run,
        realtime,
    })
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args()?;
    let config = load_config(&args.config)
        .with_context(|| format!("invalid configuration {}", args.config.display()))?;

    if args.check {
        return check_connection(&config);
    }

    let sink: Box<dyn Sink> = if args.dry_run {
        info!("dry run, records stay in memory");
        Box::new(MemorySink::new())
    } else {
        Box::new(
            FirebaseSink::new(&config.database_url, config.request_timeout())
                .context("failed to build database client")?,
        )
    };

    let frames = args.frames.as_deref().unwrap_or(Path::new("-"));
    let from_stdin = frames == Path::new("-");
    let reader: Box<dyn BufRead> = if from_stdin {
        Box::new(BufReader::new(io::stdin()))
    } else {
        Box::new(BufReader::new(File::open(frames).with_context(|| {
            format!("failed to open frames {}", frames.display())
        })?))
    };

    let source = ReplaySource::new(reader, ClassLabels::default(), config.confidence_floor);
    if args.realtime {
        relay(source, sink, SystemClock::new(), &config, !from_stdin)
    } else {
        let clock = ManualClock::starting_at(Utc::now().timestamp());
        let source = source.with_clock(clock.clone());
        relay(source, sink, clock, &config, !from_stdin)
    }
}

fn relay<D, C>(
    source: D,
    sink: Box<dyn Sink>,
    clock: C,
    config: &RelayConfig,
    watch_stdin: bool,
) -> Result<()>
where
    D: DetectionSource<Error = SourceError>,
    C: Clock,
{
    let mut pipeline = RelayPipeline::new(
        source,
        CategoryMapper::new(&config.labels),
        Stabilizer::new(config.stabilizer_config()),
        Publisher::new(sink, config.sink_path.clone(), config.write_mode),
        clock,
    );

    if watch_stdin {
        let stop = pipeline.stop_handle();
        thread::spawn(move || {
            for line in io::stdin().lock().lines() {
                match line {
                    Ok(line) if line.trim().eq_ignore_ascii_case("q") => {
                        info!("stop requested");
                        stop.stop();
                        break;
                    }
                    Ok(_) => {}
                    Err(_) => break,
                }
            }
        });
        info!("type q + Enter to stop");
    }

    let stats = pipeline.run_with(|report| {
        if let (Some(text), Some(bbox)) = (
            report.overlay_text(),
            report.detection.as_ref().and_then(|d| d.bbox),
        ) {
            debug!("{text} at {:?}", bbox.to_pixel_tlbr());
        }
    })?;

    if stats.failed > 0 {
        warn!("{} of {} publish attempts failed", stats.failed, stats.failed + stats.published);
    }
    Ok(())
}

fn check_connection(config: &RelayConfig) -> Result<()> {
    let sink = FirebaseSink::new(&config.database_url, config.request_timeout())
        .context("failed to build database client")?;
    let value = sink
        .check_connection(&config.sink_path)
        .with_context(|| format!("connection check against {} failed", config.database_url))?;
    info!("connected, {} holds {value}", config.sink_path);
    Ok(())
}
