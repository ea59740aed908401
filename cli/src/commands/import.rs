use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use colored::*;
use hostdisco_common::config::DiscoveryConfig;
use hostdisco_common::facts::FactSet;
use hostdisco_common::host::DiscoveredHost;
use hostdisco_core::adapters::events::TracingSink;
use hostdisco_core::adapters::memory::InMemoryHostRepository;
use hostdisco_core::adapters::vendors::MacOuiRepo;
use hostdisco_core::discovery::DiscoveryService;
use hostdisco_core::registrar::Registration;
use tracing::error;

use crate::terminal::{colors, format, print};

#[derive(Default)]
struct Tally {
    created: usize,
    updated: usize,
    failed: usize,
}

pub async fn import(
    files: Vec<PathBuf>,
    cfg: DiscoveryConfig,
    no_vendor: bool,
    quiet: u8,
) -> anyhow::Result<()> {
    let mut service = DiscoveryService::new(
        cfg,
        Arc::new(InMemoryHostRepository::new()),
        Arc::new(TracingSink),
    )?;
    if !no_vendor {
        service = service.with_vendors(Arc::new(MacOuiRepo));
    }

    let start_time: Instant = Instant::now();
    let mut tally = Tally::default();

    for path in &files {
        let facts = match FactSet::from_json_file(path) {
            Ok(facts) => facts,
            Err(err) => {
                error!("{}: {err}", path.display());
                tally.failed += 1;
                continue;
            }
        };

        match service.import_host(&facts).await {
            Ok(Registration::Created(_)) => tally.created += 1,
            Ok(Registration::Updated(_)) => tally.updated += 1,
            Err(err) => {
                error!("{}: {err}", path.display());
                tally.failed += 1;
            }
        }
    }

    let hosts = service.hosts().await?;
    import_ends(&hosts, &tally, start_time.elapsed(), quiet);

    if tally.failed > 0 && hosts.is_empty() {
        anyhow::bail!("no host could be imported");
    }
    Ok(())
}

fn import_ends(hosts: &[DiscoveredHost], tally: &Tally, total_time: Duration, quiet: u8) {
    if hosts.is_empty() {
        print::header("zero hosts registered", quiet);
        print::no_results();
        return;
    }

    print::header("discovered hosts", quiet);
    if quiet < 2 {
        for (idx, host) in hosts.iter().enumerate() {
            print_host_tree(host, idx);
            if idx + 1 != hosts.len() {
                print::print("");
            }
        }
    }
    print_summary(tally, total_time, quiet);
}

fn print_host_tree(host: &DiscoveredHost, idx: usize) {
    print::tree_head(idx, &host.name);
    print::as_tree_one_level(format::host_details(host));
}

fn print_summary(tally: &Tally, total_time: Duration, quiet: u8) {
    let created: ColoredString = format!("{} new", tally.created).bold().green();
    let updated: ColoredString = format!("{} refreshed", tally.updated).bold().cyan();
    let failed: ColoredString = format!("{} failed", tally.failed).bold().red();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output = format!("Import complete: {created}, {updated}, {failed} in {total_time}")
        .color(colors::TEXT_DEFAULT)
        .to_string();

    if quiet == 0 {
        print::fat_separator();
        print::centerln(&output);
    } else {
        print::print(&output);
    }
}
