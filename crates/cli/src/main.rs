use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use famhx_core::{
    CoreConfig, EditSession, FamilyHistoryService, InMemoryStore, PatientHeader, SortColumn,
};
use fhir::vocabulary::family_relationships;
use fhir::{Patient, Quantity, QuantityFormat, Range};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "famhx")]
#[command(about = "Family member history CLI")]
struct Cli {
    /// Patient id (overrides FAMHX_PATIENT_ID)
    #[arg(long, global = true)]
    patient: Option<String>,
    /// JSON search result to seed the in-memory store from (overrides FAMHX_SEED_FILE)
    #[arg(long, global = true)]
    seed: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a quantity such as ">=12.5 mg"
    ParseQuantity { text: String },
    /// Parse a quantity and format it again
    FormatQuantity {
        text: String,
        /// Fixed number of decimals
        #[arg(long)]
        digits: Option<usize>,
        #[arg(long)]
        no_comparator: bool,
        #[arg(long)]
        no_units: bool,
    },
    /// Parse a range such as "50-75"
    ParseRange { text: String },
    /// Parse an age range, including decades such as "40s"
    ParseAge { text: String },
    /// List relationship keys, codes and displays
    Relationships,
    /// List the patient's family history table
    List {
        #[arg(long, value_enum)]
        sort: Option<SortArg>,
        #[arg(long)]
        descending: bool,
    },
    /// Add a family member (the seed file is not modified)
    Add {
        /// Relationship key, e.g. Father
        #[arg(long)]
        relationship: String,
        #[arg(long)]
        name: Option<String>,
        /// Sex key, e.g. Female
        #[arg(long)]
        sex: Option<String>,
        /// Age or age range, e.g. 62 or 40s
        #[arg(long)]
        age: Option<String>,
        /// Age at death; marks the relative as deceased
        #[arg(long)]
        deceased_age: Option<String>,
        #[arg(long)]
        note: Option<String>,
    },
    /// Delete a family member (the seed file is not modified)
    Delete { id: String },
    /// Summarise a Patient resource file
    Header { patient: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Relationship,
    Name,
    Sex,
    Age,
    Conditions,
}

impl From<SortArg> for SortColumn {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Relationship => SortColumn::Relationship,
            SortArg::Name => SortColumn::Name,
            SortArg::Sex => SortColumn::Sex,
            SortArg::Age => SortColumn::Age,
            SortArg::Conditions => SortColumn::Conditions,
        }
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("famhx=info".parse()?)
                .add_directive("famhx_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let cfg = Arc::new(CoreConfig::from_env_values(
        cli.patient.or_else(|| std::env::var("FAMHX_PATIENT_ID").ok()),
        cli.seed.or_else(|| std::env::var("FAMHX_SEED_FILE").ok()),
    )?);
    tracing::debug!("using Patient/{}", cfg.patient_id());

    match cli.command {
        Some(Commands::ParseQuantity { text }) => print_parsed(Quantity::parse(&text))?,
        Some(Commands::FormatQuantity {
            text,
            digits,
            no_comparator,
            no_units,
        }) => match Quantity::parse(&text) {
            Some(quantity) => println!(
                "{}",
                quantity.format(QuantityFormat {
                    fraction_digits: digits,
                    include_comparator: !no_comparator,
                    include_units: !no_units,
                })
            ),
            None => println!("no match"),
        },
        Some(Commands::ParseRange { text }) => print_parsed(Range::parse(&text))?,
        Some(Commands::ParseAge { text }) => print_parsed(Range::parse_age(&text))?,
        Some(Commands::Relationships) => {
            for entry in family_relationships().entries() {
                println!("{}\t{}\t{}", entry.key, entry.code, entry.display);
            }
        }
        Some(Commands::List { sort, descending }) => {
            let service = open_service(cfg)?;
            let rows = match sort {
                Some(column) => service.sorted_rows(column.into(), descending),
                None => service.rows(),
            };
            print_json(&rows)?;
        }
        Some(Commands::Add {
            relationship,
            name,
            sex,
            age,
            deceased_age,
            note,
        }) => {
            let mut service = open_service(cfg.clone())?;
            let mut session = EditSession::new().open_new(cfg.patient_id().as_str())?;
            session.set_relationship_key(&relationship)?;
            session.set_sex_key(sex.as_deref())?;
            if let Some(name) = name {
                session.set_name(&name);
            }
            if let Some(age) = age {
                session.set_age_text(&age);
            }
            if let Some(deceased_age) = deceased_age {
                session.set_deceased(true);
                session.set_deceased_age_text(&deceased_age);
            }
            if let Some(note) = note {
                session.set_note(&note);
            }

            let (_closed, request) = session.save();
            let saved = service.save(request)?;
            println!("{}", saved.render_json()?);
        }
        Some(Commands::Delete { id }) => {
            let mut service = open_service(cfg)?;
            service.delete(&id)?;
            print_json(&service.rows())?;
        }
        Some(Commands::Header { patient }) => {
            let text = std::fs::read_to_string(&patient)
                .with_context(|| format!("failed to read {}", patient.display()))?;
            let patient = Patient::parse_json(&text)?;
            let today = chrono::Local::now().date_naive();
            print_json(&PatientHeader::from_patient(&patient, today))?;
        }
        None => {
            println!("Use 'famhx --help' for commands");
        }
    }

    Ok(())
}

fn open_service(cfg: Arc<CoreConfig>) -> anyhow::Result<FamilyHistoryService<InMemoryStore>> {
    let store = match cfg.seed_file() {
        Some(path) => InMemoryStore::from_seed_file(path)
            .with_context(|| format!("failed to seed store from {}", path.display()))?,
        None => InMemoryStore::new(),
    };
    let mut service = FamilyHistoryService::new(cfg, store);
    service.load()?;
    Ok(service)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_parsed<T: Serialize>(value: Option<T>) -> anyhow::Result<()> {
    match value {
        Some(value) => print_json(&value),
        None => {
            println!("no match");
            Ok(())
        }
    }
}
