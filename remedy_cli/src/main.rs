use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use remedy_core::store::{FileDosages, FileDrugs, FileTreatments};
use remedy_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "remedy")]
#[command(about = "Drug treatment prescription system", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a drug
    AddDrug {
        /// Drug name
        #[arg(long)]
        name: String,
    },

    /// Register a dosage (one dose, taken a number of times a day)
    AddDosage {
        /// Units per intake, e.g. 9
        #[arg(long)]
        quantity: String,

        /// Form of one intake, e.g. Drops
        #[arg(long)]
        form: String,

        /// Intakes per day
        #[arg(long)]
        intakes: String,
    },

    /// Prescribe a treatment
    Prescribe {
        #[arg(long)]
        drug_id: String,

        #[arg(long)]
        dosage_id: String,

        /// First day of the treatment (yyyy-MM-dd)
        #[arg(long)]
        start_date: String,

        #[arg(long)]
        period_amount: String,

        /// Days, Months, Years or Forever; defaults from config
        #[arg(long)]
        period_unit: Option<String>,

        /// Direction mode: Daily, Periodic or Decreasing; Daily when omitted
        #[arg(long)]
        mode: Option<String>,

        /// Days taken per cycle (Periodic)
        #[arg(long)]
        taken: Option<String>,

        /// Pause days per cycle (Periodic)
        #[arg(long)]
        interval: Option<String>,

        /// Daily intake decrease (Decreasing)
        #[arg(long)]
        delta: Option<String>,

        /// Intake amount the taper stops at (Decreasing)
        #[arg(long)]
        limit: Option<String>,
    },

    /// List persisted treatments
    List,

    /// List drugs that appear on persisted treatments
    Drugs,

    /// Tell whether a treatment is used on a given date
    Usage {
        #[arg(long)]
        treatment_id: String,

        /// Date to check (yyyy-MM-dd)
        #[arg(long)]
        date: String,
    },

    /// Export persisted treatments to CSV
    Export {
        /// Output file; defaults to treatments.csv in the data directory
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    remedy_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    std::fs::create_dir_all(&data_dir)?;

    match cli.command {
        Commands::AddDrug { name } => cmd_add_drug(&data_dir, name),
        Commands::AddDosage {
            quantity,
            form,
            intakes,
        } => cmd_add_dosage(&data_dir, &quantity, form, &intakes),
        Commands::Prescribe {
            drug_id,
            dosage_id,
            start_date,
            period_amount,
            period_unit,
            mode,
            taken,
            interval,
            delta,
            limit,
        } => {
            let unit =
                period_unit.unwrap_or_else(|| config.prescribe.default_period_unit.clone());
            cmd_prescribe(
                &data_dir,
                PrescribeArgs {
                    drug_id,
                    dosage_id,
                    start_date,
                    period_amount,
                    period_unit: unit,
                    mode,
                    taken,
                    interval,
                    delta,
                    limit,
                },
            )
        }
        Commands::List => cmd_list(&data_dir),
        Commands::Drugs => cmd_drugs(&data_dir),
        Commands::Usage { treatment_id, date } => cmd_usage(&data_dir, &treatment_id, &date),
        Commands::Export { out } => cmd_export(&data_dir, out),
    }
}

struct PrescribeArgs {
    drug_id: String,
    dosage_id: String,
    start_date: String,
    period_amount: String,
    period_unit: String,
    mode: Option<String>,
    taken: Option<String>,
    interval: Option<String>,
    delta: Option<String>,
    limit: Option<String>,
}

fn cmd_add_drug(data_dir: &std::path::Path, name: String) -> Result<()> {
    let mut drugs = FileDrugs::new(data_dir);

    let saved = drugs.save(Drug::new(name))?;

    println!(
        "Saved drug '{}' with id {}",
        saved.name,
        saved.id.as_deref().unwrap_or_default()
    );
    Ok(())
}

fn cmd_add_dosage(
    data_dir: &std::path::Path,
    quantity: &str,
    form: String,
    intakes: &str,
) -> Result<()> {
    let quantity: i32 = quantity
        .parse()
        .map_err(|_| Error::Validation(format!("'Quantity' is malformed: '{}'", quantity)))?;
    let intakes: i32 = intakes
        .parse()
        .map_err(|_| Error::Validation(format!("'Intakes' is malformed: '{}'", intakes)))?;

    let mut dosages = FileDosages::new(data_dir);

    let saved = dosages.save(Dosage::new(Dose { quantity, form }, intakes))?;

    println!(
        "Saved dosage '{}' with id {}",
        saved.regimen(),
        saved.id.as_deref().unwrap_or_default()
    );
    Ok(())
}

fn cmd_prescribe(data_dir: &std::path::Path, args: PrescribeArgs) -> Result<()> {
    let drugs = FileDrugs::new(data_dir);
    let dosages = FileDosages::new(data_dir);
    let mut treatments = FileTreatments::new(data_dir);

    let mut request = PrescribeTreatmentRequest::new()
        .drug_id(args.drug_id)
        .dosage_id(args.dosage_id)
        .start_date(args.start_date)
        .period_amount(args.period_amount)
        .period_unit(args.period_unit);

    if let Some(mode) = args.mode {
        request = request.direction_mode_type(mode);
    }
    if let Some(taken) = args.taken {
        request = request.direction_mode_taken(taken);
    }
    if let Some(interval) = args.interval {
        request = request.direction_mode_interval(interval);
    }
    if let Some(delta) = args.delta {
        request = request.direction_mode_delta(delta);
    }
    if let Some(limit) = args.limit {
        request = request.direction_mode_limit(limit);
    }

    let treatment = prescribe_treatment(&drugs, &dosages, &mut treatments, &request)?;

    println!(
        "Prescribed treatment {}",
        treatment.id.as_deref().unwrap_or_default()
    );
    println!("  {}, {}", treatment.drug.name, treatment.dosage.regimen());
    println!(
        "  from {} to {} ({})",
        treatment.starts_on, treatment.stops_on, treatment.direction_mode
    );
    Ok(())
}

fn cmd_list(data_dir: &std::path::Path) -> Result<()> {
    let treatments = FileTreatments::new(data_dir);

    let all = treatments.find_all()?;
    if all.is_empty() {
        println!("No treatments prescribed");
        return Ok(());
    }

    for t in all {
        println!(
            "{}  {}  {} to {}  ({})",
            t.id.as_deref().unwrap_or_default(),
            t.drug.name,
            t.starts_on,
            t.stops_on,
            t.direction_mode
        );
    }
    Ok(())
}

fn cmd_drugs(data_dir: &std::path::Path) -> Result<()> {
    let treatments = FileTreatments::new(data_dir);

    let drugs = prescribed_drugs(&treatments)?;
    if drugs.is_empty() {
        println!("No drugs prescribed");
        return Ok(());
    }

    for drug in drugs {
        println!("{}  {}", drug.id.as_deref().unwrap_or_default(), drug.name);
    }
    Ok(())
}

fn cmd_usage(data_dir: &std::path::Path, treatment_id: &str, date: &str) -> Result<()> {
    let date: NaiveDate = date.parse().map_err(|_| {
        Error::Validation(format!(
            "'Date' is malformed: '{}'. Accepted format is 'yyyy-MM-dd'",
            date
        ))
    })?;

    let treatments = FileTreatments::new(data_dir);
    let treatment = treatments
        .find_by_id(treatment_id)?
        .ok_or_else(|| Error::NotFound(format!("No treatment found with '{}' id", treatment_id)))?;

    if treatment.is_used_on(date) {
        println!("{}: used ({})", date, treatment.direction_mode);
    } else {
        println!("{}: not used", date);
    }
    Ok(())
}

fn cmd_export(data_dir: &std::path::Path, out: Option<PathBuf>) -> Result<()> {
    let treatments = FileTreatments::new(data_dir);
    let csv_path = out.unwrap_or_else(|| data_dir.join("treatments.csv"));

    let written = treatments_to_csv(&treatments.find_all()?, &csv_path)?;

    println!("Exported {} treatments to {}", written, csv_path.display());
    Ok(())
}
