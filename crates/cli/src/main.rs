use clap::{Parser, Subcommand};
use salon_core::constants::TOP_CLIENTS;
use salon_core::{
    resolve_paths, Appointment, Category, CoreConfig, HolidaySet, Proposal, SalonError,
    SchedulingPolicy, SchedulingService, TimeBand,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "salon")]
#[command(about = "Salon appointment booking CLI")]
struct Cli {
    /// Appointment document (default: clientes.json)
    #[arg(long, global = true, env = "SALON_DATA_FILE")]
    data_file: Option<PathBuf>,
    /// Holiday document (default: feriados.json)
    #[arg(long, global = true, env = "SALON_HOLIDAYS_FILE")]
    holidays_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all appointments, numbered for selection
    List,
    /// Book an appointment
    Book {
        /// Client name
        name: String,
        /// Category (Cabello, Uñas, Facial, Depilación)
        category: String,
        /// Service offered under the category
        service: String,
        /// Date (YYYY-MM-DD)
        date: String,
        /// Time (HH:MM, on the hour or half past, 10:00 to 18:00)
        time: String,
    },
    /// Cancel every appointment booked under a name
    Cancel {
        /// Exact client name
        name: String,
    },
    /// Cancel one appointment by its number in `list`
    CancelSelected {
        position: usize,
    },
    /// Move the first appointment booked under a name
    Modify {
        /// Exact client name
        name: String,
        /// New date (YYYY-MM-DD)
        date: String,
        /// New time (HH:MM)
        time: String,
    },
    /// Move one appointment by its number in `list`
    ModifySelected {
        position: usize,
        /// New date (YYYY-MM-DD)
        date: String,
        /// New time (HH:MM)
        time: String,
    },
    /// Search appointments by part of a client name
    Search {
        fragment: String,
    },
    /// Show booking statistics
    Stats,
    /// Export all appointments as CSV
    Export {
        #[arg(long, default_value = salon_export::DEFAULT_EXPORT_FILE)]
        output: PathBuf,
    },
    /// Show categories and their services
    Catalog,
}

fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("salon=info".parse()?)
                .add_directive("salon_core=info".parse()?)
                .add_directive("salon_export=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            // Refused bookings are shown exactly as the rule worded them.
            match e.downcast_ref::<SalonError>().and_then(SalonError::rejection) {
                Some(rejection) => eprintln!("{rejection}"),
                None => eprintln!("error: {e:#}"),
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        println!("Use --help to see available commands");
        return Ok(());
    };

    let open = || open_service(cli.data_file.clone(), cli.holidays_file.clone());

    match command {
        Commands::List => {
            let appointments = open()?.list();
            if appointments.is_empty() {
                println!("No appointments booked.");
            }
            for (i, appointment) in appointments.iter().enumerate() {
                println!("{:>3}. {}", i + 1, appointment.summary());
            }
        }
        Commands::Book {
            name,
            category,
            service: offered,
            date,
            time,
        } => {
            let proposal = Proposal::new(name, category, offered, date, time);
            let booked = open()?.create(&proposal)?;
            println!("Appointment booked with id {}.", booked.id);
        }
        Commands::Cancel { name } => {
            let removed = open()?.cancel(&name)?;
            if removed.len() > 1 {
                eprintln!(
                    "warning: {} appointments were booked under '{}'; all of them were cancelled",
                    removed.len(),
                    name
                );
            }
            println!("Cancelled {} appointment(s).", removed.len());
            print_each(&removed);
        }
        Commands::CancelSelected { position } => {
            let removed = open()?.cancel_selected(position)?;
            println!("Cancelled: {}", removed.summary());
        }
        Commands::Modify { name, date, time } => {
            let moved = open()?.modify(&name, &date, &time)?;
            println!("Appointment moved: {}", moved.summary());
        }
        Commands::ModifySelected {
            position,
            date,
            time,
        } => {
            let moved = open()?.modify_selected(position, &date, &time)?;
            println!("Appointment moved: {}", moved.summary());
        }
        Commands::Search { fragment } => {
            for line in open()?.search(&fragment).lines() {
                println!("{line}");
            }
        }
        Commands::Stats => {
            let stats = open()?.statistics();
            println!("Total appointments: {}", stats.total);
            println!();
            println!("By category:");
            for (category, count) in &stats.by_category {
                println!("  {category}: {count}");
            }
            println!();
            println!("By time of day:");
            for band in TimeBand::ALL {
                println!("  {}: {}", band.label(), stats.band_count(band));
            }
            println!();
            println!("Top clients:");
            for (name, count) in stats.top_clients(TOP_CLIENTS) {
                println!("  {name}: {count}");
            }
        }
        Commands::Export { output } => {
            let appointments = open()?.list();
            salon_export::export_csv(&appointments, &output)?;
            println!(
                "Exported {} appointments to {}",
                appointments.len(),
                output.display()
            );
        }
        Commands::Catalog => print_catalog(),
    }

    Ok(())
}

/// Loads the holiday document and builds the service over the appointment document.
fn open_service(
    data_file: Option<PathBuf>,
    holidays_file: Option<PathBuf>,
) -> anyhow::Result<SchedulingService> {
    let (appointments_path, holidays_path) = resolve_paths(data_file, holidays_file);
    let holidays = Arc::new(HolidaySet::load(&holidays_path));
    let cfg = Arc::new(CoreConfig::new(
        appointments_path,
        holidays_path,
        SchedulingPolicy::default(),
    )?);
    tracing::debug!(
        "using appointments file {}",
        cfg.appointments_path().display()
    );
    Ok(SchedulingService::new(cfg, holidays))
}

fn print_each(appointments: &[Appointment]) {
    for appointment in appointments {
        println!("  {}", appointment.summary());
    }
}

fn print_catalog() {
    for category in Category::ALL {
        println!("{category}:");
        for service in category.services() {
            println!("  {service}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_book_command() {
        let cli = Cli::try_parse_from([
            "salon",
            "book",
            "Ana Gomez",
            "Uñas",
            "Manicura",
            "2026-03-05",
            "11:00",
        ])
        .expect("valid arguments");

        match cli.command {
            Some(Commands::Book { name, time, .. }) => {
                assert_eq!(name, "Ana Gomez");
                assert_eq!(time, "11:00");
            }
            _ => panic!("expected book command"),
        }
    }

    #[test]
    fn global_file_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "salon",
            "list",
            "--data-file",
            "/tmp/turnos.json",
            "--holidays-file",
            "/tmp/feriados.json",
        ])
        .expect("valid arguments");

        assert_eq!(cli.data_file, Some(PathBuf::from("/tmp/turnos.json")));
        assert_eq!(cli.holidays_file, Some(PathBuf::from("/tmp/feriados.json")));
    }

    #[test]
    fn export_defaults_to_turnos_csv() {
        let cli = Cli::try_parse_from(["salon", "export"]).expect("valid arguments");
        match cli.command {
            Some(Commands::Export { output }) => assert_eq!(output, PathBuf::from("turnos.csv")),
            _ => panic!("expected export command"),
        }
    }

    #[test]
    fn catalog_does_not_open_the_documents() {
        // A directory is never a valid appointment document.
        let dir = std::env::temp_dir();
        let dir = dir.to_str().expect("utf-8 temp dir");

        let catalog = Cli::try_parse_from(["salon", "catalog", "--data-file", dir]).unwrap();
        assert!(run(catalog).is_ok());

        let list = Cli::try_parse_from(["salon", "list", "--data-file", dir]).unwrap();
        assert!(run(list).is_err());
    }

    #[test]
    fn selection_must_be_a_number() {
        assert!(Cli::try_parse_from(["salon", "cancel-selected", "first"]).is_err());
    }
}
