use chrono::NaiveDate;
use polars::prelude::{AnyValue, DataFrame};
use resource_schedule::{
    AllocationQuery, AllocationStatus, AllocationStore, InMemoryAllocationStore, NewAllocation,
    ResourceType, ScheduleReport, SchedulingConfig, allocations_dataframe,
    load_allocations_from_csv, load_allocations_from_json, save_allocations_to_csv,
    save_allocations_to_json,
};
use std::io::{self, Write};
use std::str::FromStr;

fn cell_text(av: &AnyValue) -> String {
    match av {
        AnyValue::Null => String::new(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::Float64(v) => format!("{v:.2}"),
        AnyValue::String(s) => s.to_string(),
        _ => av.to_string(),
    }
}

fn render_df_as_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut rows: Vec<Vec<String>> = Vec::with_capacity(df.height());
    for row_idx in 0..df.height() {
        let row = columns
            .iter()
            .map(|col| col.get(row_idx).map(|av| cell_text(&av)).unwrap_or_default())
            .collect();
        rows.push(row);
    }

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for row in &rows {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.len());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |cells: &[String]| {
        let mut line = String::from("|");
        for (ci, cell) in cells.iter().enumerate() {
            line.push(' ');
            line.push_str(cell);
            line.push_str(&" ".repeat(widths[ci].saturating_sub(cell.len())));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&col_names));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &rows {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  add <type> <resource_id> <project_id> <start> <end> [amount]\n                                     Allocate a resource (amount = hours/day for employees, quantity otherwise)\n  status <id> <status>               Move allocation to scheduled|in_progress|completed|cancelled\n  list [project_id]                  List allocations\n  report                             Utilization and conflicts per resource\n  conflicts                          List conflicting allocation pairs\n  week [YYYY-MM-DD]                  Show the week containing the date (default: current reference)\n  next | prev                        Move the reference date one week\n  config show                        Show scheduling configuration\n  config load <json_path>            Load scheduling configuration\n  save <json|csv> <path>             Persist allocations to disk\n  load <json|csv> <path>             Replace allocations from disk\n  quit|exit                          Exit"
    );
}

fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()
}

fn print_allocations(store: &InMemoryAllocationStore, query: &AllocationQuery) {
    match store.list_allocations(query) {
        Ok(allocations) => match allocations_dataframe(&allocations) {
            Ok(df) => println!("{}", render_df_as_text_table(&df)),
            Err(e) => println!("Error: {}", e),
        },
        Err(e) => println!("Error: {}", e),
    }
}

fn build_report(
    store: &InMemoryAllocationStore,
    config: &SchedulingConfig,
) -> Option<ScheduleReport> {
    match store.list_allocations(&AllocationQuery::all()) {
        Ok(allocations) => Some(ScheduleReport::build(&allocations, config)),
        Err(e) => {
            println!("Error: {}", e);
            None
        }
    }
}

fn print_week(config: &SchedulingConfig, date: NaiveDate) {
    let navigator = config.week_navigator();
    let Some(window) = navigator.window(date) else {
        println!("Week around {} is out of range", date);
        return;
    };
    println!("Week {} .. {}", window.start, window.end);
    let days = window
        .days()
        .iter()
        .map(|d| d.format("%a %m-%d").to_string())
        .collect::<Vec<_>>()
        .join(" | ");
    println!("{}", days);
}

fn print_config(config: &SchedulingConfig) {
    println!("Available hours    : {}", config.available_hours);
    println!("Week start         : {}", config.week_start);
    println!("Conflict scan      : {:?}", config.conflict_scan);
    println!("Boundary policy    : {:?}", config.boundary_policy);
}

fn main() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "resource_schedule=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut config = match SchedulingConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Ignoring environment overrides: {}", e);
            SchedulingConfig::default()
        }
    };
    let store = InMemoryAllocationStore::new();
    let mut reference = chrono::Local::now().date_naive();

    println!("Resource Schedule (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "add" => {
                let args: Vec<&str> = parts.collect();
                if args.len() < 5 {
                    println!(
                        "Usage: add <type> <resource_id> <project_id> <start> <end> [amount]"
                    );
                    continue;
                }
                let resource_type = match ResourceType::from_str(args[0]) {
                    Ok(v) => v,
                    Err(e) => {
                        println!("Error: {}", e);
                        continue;
                    }
                };
                let (Some(start), Some(end)) = (parse_date(args[3]), parse_date(args[4])) else {
                    println!("Invalid date (YYYY-MM-DD)");
                    continue;
                };
                let mut new = NewAllocation::new(args[1], resource_type, args[2], start, end);
                if let Some(amount_s) = args.get(5) {
                    let amount: f64 = match amount_s.parse() {
                        Ok(v) => v,
                        Err(_) => {
                            println!("Invalid amount");
                            continue;
                        }
                    };
                    new = if resource_type.uses_hours() {
                        new.with_hours_per_day(amount)
                    } else {
                        new.with_quantity(amount)
                    };
                }
                match store.create_allocation(new) {
                    Ok(allocation) => println!("Created allocation {}", allocation.id),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "status" => match (parts.next(), parts.next()) {
                (Some(id), Some(status_s)) => {
                    let status = match AllocationStatus::from_str(status_s) {
                        Ok(v) => v,
                        Err(e) => {
                            println!("Error: {}", e);
                            continue;
                        }
                    };
                    match store.update_allocation_status(id, status) {
                        Ok(allocation) => {
                            println!("Allocation {} is now {}.", allocation.id, allocation.status)
                        }
                        Err(e) => println!("Error: {}", e),
                    }
                }
                _ => println!("Usage: status <id> <status>"),
            },
            "list" => {
                let query = match parts.next() {
                    Some(project_id) => AllocationQuery::for_project(project_id),
                    None => AllocationQuery::all(),
                };
                print_allocations(&store, &query);
            }
            "report" => {
                if let Some(report) = build_report(&store, &config) {
                    println!("Report ({})", report.to_cli_summary());
                    match report.to_dataframe() {
                        Ok(df) => println!("{}", render_df_as_text_table(&df)),
                        Err(e) => println!("Error: {}", e),
                    }
                }
            }
            "conflicts" => {
                if let Some(report) = build_report(&store, &config) {
                    if report.conflict_count() == 0 {
                        println!("No conflicts.");
                    }
                    for resource in report.overbooked() {
                        for conflict in &resource.conflicts {
                            println!(
                                "Conflict {}: {} ({}) overlaps {} ({}) from {} to {}",
                                resource.key,
                                conflict.allocation1.id,
                                conflict.allocation1.project_id,
                                conflict.allocation2.id,
                                conflict.allocation2.project_id,
                                conflict.overlap_range.0,
                                conflict.overlap_range.1
                            );
                        }
                    }
                }
            }
            "week" => {
                if let Some(date_s) = parts.next() {
                    match parse_date(date_s) {
                        Some(date) => reference = date,
                        None => {
                            println!("Invalid date (YYYY-MM-DD)");
                            continue;
                        }
                    }
                }
                print_week(&config, reference);
            }
            "next" | "prev" => {
                let navigator = config.week_navigator();
                let stepped = if cmd == "next" {
                    navigator.next_week(reference)
                } else {
                    navigator.previous_week(reference)
                };
                match stepped {
                    Some(date) => {
                        reference = date;
                        print_week(&config, reference);
                    }
                    None => println!("No week beyond {} is in range", reference),
                }
            }
            "config" => match (parts.next(), parts.next()) {
                (Some("show"), _) => print_config(&config),
                (Some("load"), Some(path)) => match SchedulingConfig::load(path) {
                    Ok(loaded) => {
                        config = loaded;
                        println!("Configuration loaded from {}.", path);
                    }
                    Err(e) => println!("Error: {}", e),
                },
                _ => println!("Usage: config show | config load <json_path>"),
            },
            "save" => match (parts.next(), parts.next()) {
                (Some(format), Some(path)) => {
                    let allocations = match store.list_allocations(&AllocationQuery::all()) {
                        Ok(v) => v,
                        Err(e) => {
                            println!("Error: {}", e);
                            continue;
                        }
                    };
                    let result = match format {
                        "json" => save_allocations_to_json(&allocations, path),
                        "csv" => save_allocations_to_csv(&allocations, path),
                        _ => {
                            println!("Unknown format '{}'. Use json or csv.", format);
                            continue;
                        }
                    };
                    match result {
                        Ok(()) => println!("Allocations saved to {}.", path),
                        Err(e) => println!("Error: {}", e),
                    }
                }
                _ => println!("Usage: save <json|csv> <path>"),
            },
            "load" => match (parts.next(), parts.next()) {
                (Some(format), Some(path)) => {
                    let loaded = match format {
                        "json" => load_allocations_from_json(path),
                        "csv" => load_allocations_from_csv(path),
                        _ => {
                            println!("Unknown format '{}'. Use json or csv.", format);
                            continue;
                        }
                    };
                    match loaded {
                        Ok(allocations) => {
                            store.clear();
                            match store.import_allocations(allocations) {
                                Ok(count) => {
                                    println!("Loaded {} allocations from {}.", count, path)
                                }
                                Err(e) => println!("Error: {}", e),
                            }
                        }
                        Err(e) => println!("Error: {}", e),
                    }
                }
                _ => println!("Usage: load <json|csv> <path>"),
            },
            _ => println!("Unknown command '{}'. Type 'help'.", cmd),
        }
    }
}
