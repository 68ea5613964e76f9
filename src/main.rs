use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use log::{info, warn};
use popdash::view::{
    self, CountrySort, city_chart, city_rows, country_chart, search_cities, search_countries,
    sort_countries,
};
use popdash::{
    CityDataset, CountryAggregate, CountryDataset, ExportFormat, PopulationClientConfig,
    PopulationLoader, PopulationRecord, Selection, ViewSession, export_selection, paginate,
};

/// Browse country and city population data with flags
#[derive(Debug, Parser)]
#[command(name = "popdash", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ViewKind {
    /// City population series with reconciled flags
    Cities,
    /// Whole-country aggregates
    Countries,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List one page of cities
    Cities {
        /// Case-insensitive search on city or country
        #[arg(long, default_value = "")]
        search: String,
        /// Zero-based page number
        #[arg(long, default_value_t = 0)]
        page: usize,
        /// Skip fallback flag lookups
        #[arg(long)]
        no_fallback: bool,
    },
    /// List one page of countries
    Countries {
        /// Case-insensitive search on country name
        #[arg(long, default_value = "")]
        search: String,
        /// name-asc, name-desc, population-asc or population-desc
        #[arg(long, default_value_t = CountrySort::NameAsc)]
        sort: CountrySort,
        /// Zero-based page number
        #[arg(long, default_value_t = 0)]
        page: usize,
    },
    /// Export the first matching record
    Export {
        #[arg(value_enum)]
        view: ViewKind,
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value_t = CountrySort::NameAsc)]
        sort: CountrySort,
        /// json or csv
        #[arg(long)]
        format: ExportFormat,
        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Print a bar chart of the first matching records
    Chart {
        #[arg(value_enum)]
        view: ViewKind,
        #[arg(long, default_value = "")]
        search: String,
        /// Maximum number of bars
        #[arg(long, default_value_t = 8)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = PopulationClientConfig::from_env().context("Invalid POPDASH_* settings")?;
    if let Command::Cities { no_fallback: true, .. } = cli.command {
        config = config.without_fallback();
    }

    let loader = PopulationLoader::from_config(&config).context("Failed to create loader")?;
    let session = ViewSession::new();

    match cli.command {
        Command::Cities { search, page, .. } => {
            let dataset = session.run(loader.load_city_dataset()).await?;
            print_cities(&dataset, &search, page, config.page_size);
        }
        Command::Countries { search, sort, page } => {
            let dataset = session.run(loader.load_country_dataset()).await?;
            print_countries(&dataset, &search, sort, page, config.page_size);
        }
        Command::Export {
            view,
            search,
            sort,
            format,
            out,
        } => {
            let document = match view {
                ViewKind::Cities => {
                    let dataset = session.run(loader.load_city_dataset()).await?;
                    let hits = search_cities(&dataset.records, &search);
                    let selection: Vec<Selection<'_>> =
                        hits.into_iter().take(1).map(Selection::City).collect();
                    export_selection(&selection, format)?
                }
                ViewKind::Countries => {
                    let dataset = session.run(loader.load_country_dataset()).await?;
                    let mut hits = search_countries(&dataset.countries, &search);
                    sort_countries(&mut hits, sort);
                    let selection: Vec<Selection<'_>> =
                        hits.into_iter().take(1).map(Selection::Country).collect();
                    export_selection(&selection, format)?
                }
            };
            let path = document
                .write_to(&out)
                .with_context(|| format!("Failed to write export to {}", out.display()))?;
            println!("{}", path.display());
        }
        Command::Chart {
            view,
            search,
            limit,
        } => {
            let chart = match view {
                ViewKind::Cities => {
                    let dataset = session.run(loader.load_city_dataset()).await?;
                    let hits: Vec<&PopulationRecord> =
                        search_cities(&dataset.records, &search).into_iter().take(limit).collect();
                    city_chart(&hits)
                }
                ViewKind::Countries => {
                    let dataset = session.run(loader.load_country_dataset()).await?;
                    let hits: Vec<&CountryAggregate> = search_countries(&dataset.countries, &search)
                        .into_iter()
                        .take(limit)
                        .collect();
                    country_chart(&hits)
                }
            };
            print_chart(&chart);
        }
    }

    Ok(())
}

fn print_cities(dataset: &CityDataset, search: &str, page: usize, page_size: usize) {
    if let Some(e) = &dataset.records_error {
        warn!("City data incomplete: {e}");
    }

    let hits = search_cities(&dataset.records, search);
    let page = paginate(&hits, page, page_size);
    println!("Country-City Population Data ({} matches)", page.total);
    for row in city_rows(dataset, page.items) {
        let flag = if row.flag.is_empty() { "-" } else { row.flag };
        println!(
            "  [{:<6}] {} - {}: {}  {flag}",
            row.band, row.country, row.city, row.population
        );
    }
    if page.items.is_empty() {
        println!("  No cities or countries match your search.");
    }
    println!("Page {} of {}", page.index + 1, page.page_count);

    for (name, e) in dataset.fallback.failures() {
        info!("No flag for {name}: {e}");
    }
}

fn print_countries(
    dataset: &CountryDataset,
    search: &str,
    sort: CountrySort,
    page: usize,
    page_size: usize,
) {
    if let Some(e) = &dataset.error {
        warn!("Country data incomplete: {e}");
    }

    let mut hits = search_countries(&dataset.countries, search);
    sort_countries(&mut hits, sort);
    let page = paginate(&hits, page, page_size);
    println!("Country Population Data ({} matches, {sort})", page.total);
    for country in page.items {
        let band = popdash::models::PopulationBand::from(country.population);
        println!(
            "  [{band:<6}] {}: {} people  {}",
            country.name, country.population, country.flag
        );
    }
    if page.items.is_empty() {
        println!("  No countries match your search.");
    }
    println!("Page {} of {}", page.index + 1, page.page_count);
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn print_chart(chart: &view::ChartSeries) {
    const WIDTH: f64 = 40.0;

    println!("{} ({})", chart.title, chart.label);
    if chart.is_empty() {
        println!("  (no data)");
        return;
    }
    let max = chart.max_value();
    let label_width = chart.labels.iter().map(String::len).max().unwrap_or(0);
    for (label, value) in chart.labels.iter().zip(&chart.values) {
        let bar = if max > 0.0 {
            ((value / max) * WIDTH).round() as usize
        } else {
            0
        };
        println!(
            "  {label:<label_width$} {} {}",
            "#".repeat(bar),
            view::display_population(*value)
        );
    }
}
