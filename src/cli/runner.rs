//! CLI command runner

use super::commands::{Cli, Commands, OutputFormat, QueryArgs};
use crate::client::{ClientConfig, KokkaiClient};
use crate::error::{Error, Result};
use crate::output;
use crate::pagination::{SearchOptions, SearchResult};
use crate::query::{Endpoint, SearchParams};
use chrono::NaiveDate;
use std::time::Duration;

/// Executes one parsed CLI invocation
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a runner for parsed arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the selected command
    pub async fn run(&self) -> Result<()> {
        let client = self.build_client()?;

        let (endpoint, args) = match &self.cli.command {
            Commands::MeetingList(args) => (Endpoint::MeetingList, args),
            Commands::Meeting(args) => (Endpoint::Meeting, args),
            Commands::Speech(args) => (Endpoint::Speech, args),
        };

        let params = build_params(args)?;
        let options = build_options(args);

        let result = match endpoint {
            Endpoint::MeetingList => client.meeting_list(params, &options).await?,
            Endpoint::Meeting => client.meeting(params, &options).await?,
            Endpoint::Speech => client.speech(params, &options).await?,
        };

        self.print(endpoint, &result, args.dry_run)
    }

    fn build_client(&self) -> Result<KokkaiClient> {
        let mut builder = ClientConfig::builder()
            .page_interval(Duration::from_secs_f64(self.cli.sleep_seconds.max(0.0)));
        if let Some(dir) = &self.cli.cache_dir {
            builder = builder.cache_dir(dir);
        }
        KokkaiClient::with_config(builder.build())
    }

    fn print(&self, endpoint: Endpoint, result: &SearchResult, dry_run: bool) -> Result<()> {
        let stdout = std::io::stdout();
        let mut writer = stdout.lock();

        // Dry-run is metadata only; the envelope carries the count
        if dry_run {
            return output::write_json(&mut writer, endpoint, result, self.cli.pretty);
        }

        match self.cli.format {
            OutputFormat::Json => output::write_json(&mut writer, endpoint, result, self.cli.pretty),
            OutputFormat::Jsonl => output::write_jsonl(&mut writer, result),
            OutputFormat::Csv => output::write_csv(&mut writer, result),
        }
    }
}

/// Translate CLI flags into search parameters
fn build_params(args: &QueryArgs) -> Result<SearchParams> {
    let mut builder = SearchParams::builder();

    if let Some(any) = &args.any {
        builder = builder.any(any);
    }
    if let Some(name) = &args.name_of_meeting {
        builder = builder.name_of_meeting(name);
    }
    if let Some(name) = &args.name_of_house {
        builder = builder.name_of_house(name);
    }
    if let Some(speaker) = &args.speaker {
        builder = builder.speaker(speaker);
    }

    // --from wins over --since when both are given
    if let Some(from) = &args.from {
        builder = builder.from(parse_date(from)?);
    } else if let Some(year) = args.since {
        builder = builder.since(year);
    }
    if let Some(until) = &args.until {
        builder = builder.until(parse_date(until)?);
    }

    if let Some(n) = args.maximum_records {
        builder = builder.maximum_records(n);
    }
    if let Some(session) = args.session_from {
        builder = builder.session_from(session);
    }
    if let Some(session) = args.session_to {
        builder = builder.session_to(session);
    }

    Ok(builder.build())
}

fn build_options(args: &QueryArgs) -> SearchOptions {
    let mut options = SearchOptions::new().with_dry_run(args.dry_run);
    if let Some(limit) = args.limit_total {
        options = options.with_limit_total(limit);
    }
    options
}

fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|e| Error::validation(format!("invalid date '{text}': {e}")))
}
