use bs_app::{
    AppError, AppResult, CustomParameterSet, DEFAULT_LIBRARY_DIR, DEFAULT_RUNS_DIR,
    RunProgressEvent, RunStage, ServiceConfig, SimulationRequest, SimulationService,
    SimulationTemplate, model_catalog, parameter_info, query,
};
use bs_params::{ParameterOverrides, coerce_value};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "bs-cli")]
#[command(about = "batsim CLI - battery simulation requests from the command line", long_about = None)]
struct Cli {
    /// Service configuration YAML file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Run history directory
    #[arg(long, global = true)]
    runs_dir: Option<PathBuf>,
    /// Template and custom parameter set directory
    #[arg(long, global = true)]
    library_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List battery types, their models and parameter sets
    Models,
    /// Show the parameter values of a preset
    Parameters {
        #[arg(long, default_value = "lithium-ion")]
        battery_type: String,
        #[arg(long, default_value = "SPM")]
        model: String,
        #[arg(long, default_value = "Chen2020")]
        parameter_set: String,
    },
    /// Run a simulation
    Simulate(SimulateArgs),
    /// List stored runs, newest first
    Runs,
    /// Show details of a stored run
    ShowRun {
        /// Run ID to display
        run_id: String,
    },
    /// Export one variable of a stored run as CSV
    ExportSeries {
        /// Run ID
        run_id: String,
        /// Variable name (e.g. voltage, current, soc, temperature)
        variable: String,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List saved templates
    Templates,
    /// Save a simulation request as a named template
    SaveTemplate {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[command(flatten)]
        request: RequestArgs,
    },
    /// Run a saved template
    RunTemplate {
        name: String,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
        /// Write the JSON result to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Delete a saved template
    DeleteTemplate { name: String },
    /// List saved custom parameter sets
    ParameterSets,
    /// Save a built-in parameter set with custom values under a new name
    SaveParameterSet {
        name: String,
        #[arg(long, default_value = "lithium-ion")]
        battery_type: String,
        /// Built-in parameter set the custom values apply to
        #[arg(long, default_value = "Chen2020")]
        base: String,
        /// Custom value NAME=VALUE (repeatable)
        #[arg(short, long = "param", value_name = "NAME=VALUE")]
        params: Vec<String>,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Delete a saved custom parameter set
    DeleteParameterSet { name: String },
}

#[derive(Args)]
struct SimulateArgs {
    #[command(flatten)]
    request: RequestArgs,
    /// Skip cache and force re-run
    #[arg(long)]
    no_cache: bool,
    /// Write the JSON result to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct RequestArgs {
    #[arg(long, default_value = "lithium-ion")]
    battery_type: String,
    #[arg(long, default_value = "SPM")]
    model: String,
    #[arg(long, default_value = "Chen2020")]
    parameter_set: String,
    #[arg(long, default_value = "constant_current")]
    experiment_type: String,
    /// Parameter override NAME=VALUE (repeatable)
    #[arg(short, long = "param", value_name = "NAME=VALUE")]
    params: Vec<String>,
    /// YAML or JSON file with overrides, flat or grouped by category
    #[arg(long, value_name = "FILE")]
    overrides: Option<PathBuf>,
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let Cli {
        config,
        runs_dir,
        library_dir,
        command,
    } = Cli::parse();
    let service = |use_cache: bool| {
        build_service(
            config.as_deref(),
            runs_dir.clone(),
            library_dir.clone(),
            use_cache,
        )
    };

    match command {
        Commands::Models => cmd_models(),
        Commands::Parameters {
            battery_type,
            model,
            parameter_set,
        } => cmd_parameters(&battery_type, &model, &parameter_set),
        Commands::Simulate(args) => cmd_simulate(&service(!args.no_cache)?, args),
        Commands::Runs => cmd_runs(&service(true)?),
        Commands::ShowRun { run_id } => cmd_show_run(&service(true)?, &run_id),
        Commands::ExportSeries {
            run_id,
            variable,
            output,
        } => cmd_export_series(&service(true)?, &run_id, &variable, output.as_deref()),
        Commands::Templates => cmd_templates(&service(true)?),
        Commands::SaveTemplate {
            name,
            description,
            request,
        } => cmd_save_template(&service(true)?, name, description, request),
        Commands::RunTemplate {
            name,
            no_cache,
            output,
        } => {
            let service = service(!no_cache)?;
            let request = service.template_request(&name)?;
            run_and_report(&service, &request, output.as_deref())
        }
        Commands::DeleteTemplate { name } => {
            service(true)?.delete_template(&name)?;
            println!("✓ Deleted template {}", name);
            Ok(())
        }
        Commands::ParameterSets => cmd_parameter_sets(&service(true)?),
        Commands::SaveParameterSet {
            name,
            battery_type,
            base,
            params,
            description,
        } => {
            let custom_parameters = parse_custom_values(&params)?;
            let set = CustomParameterSet {
                name,
                description,
                battery_type,
                base_parameter_set: base,
                custom_parameters,
                created_at: String::new(),
            };
            let saved = service(true)?.save_parameter_set(set)?;
            println!(
                "✓ Saved parameter set {} ({} on {})",
                saved.name,
                saved.custom_parameters.len(),
                saved.base_parameter_set
            );
            Ok(())
        }
        Commands::DeleteParameterSet { name } => {
            service(true)?.delete_parameter_set(&name)?;
            println!("✓ Deleted parameter set {}", name);
            Ok(())
        }
    }
}

fn build_service(
    config_path: Option<&Path>,
    runs_dir: Option<PathBuf>,
    library_dir: Option<PathBuf>,
    use_cache: bool,
) -> AppResult<SimulationService> {
    let mut config = match config_path {
        Some(path) => ServiceConfig::load(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(dir) = runs_dir {
        config.runs_dir = Some(dir);
    }
    if config.runs_dir.is_none() {
        config.runs_dir = Some(PathBuf::from(DEFAULT_RUNS_DIR));
    }
    if let Some(dir) = library_dir {
        config.library_dir = Some(dir);
    }
    if config.library_dir.is_none() {
        config.library_dir = Some(PathBuf::from(DEFAULT_LIBRARY_DIR));
    }
    config.use_cache = config.use_cache && use_cache;
    tracing::debug!(
        runs_dir = ?config.runs_dir,
        library_dir = ?config.library_dir,
        use_cache = config.use_cache,
        "cli service config"
    );
    SimulationService::with_reference_engine(config)
}

fn cmd_models() -> AppResult<()> {
    let catalog = model_catalog();
    for (id, chemistry) in &catalog.battery_types {
        println!("{} - {}", id, chemistry.name);
        println!("  {}", chemistry.description);
        println!("  Models:");
        for model in &chemistry.models {
            println!("    {:<10} {}", model.key, model.description);
        }
        println!("  Parameter sets: {}", chemistry.parameter_sets.join(", "));
    }
    println!("\nExperiment types:");
    for (key, name) in &catalog.experiment_types {
        println!("  {:<20} {}", key, name);
    }
    Ok(())
}

fn cmd_parameters(battery_type: &str, model: &str, parameter_set: &str) -> AppResult<()> {
    let info = parameter_info(battery_type, model, parameter_set)?;
    println!(
        "Parameters of {} ({} / {}):",
        info.parameter_set, info.battery_type, info.model
    );
    for (name, entry) in &info.parameters {
        println!("  [{:<15}] {:<55} {}", entry.category, name, entry.value);
    }
    Ok(())
}

/// Split `NAME=VALUE`. The value is kept as text; validation coerces it.
fn parse_param(raw: &str) -> AppResult<(String, Value)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| AppError::InvalidInput(format!("Expected NAME=VALUE, got '{}'", raw)))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput(format!(
            "Parameter name missing in '{}'",
            raw
        )));
    }
    Ok((name.to_string(), Value::String(value.trim().to_string())))
}

fn load_overrides(path: &Path) -> AppResult<BTreeMap<String, Value>> {
    let content = std::fs::read_to_string(path)?;
    let overrides: ParameterOverrides = serde_yaml::from_str(&content).map_err(|e| {
        AppError::InvalidInput(format!(
            "Failed to parse overrides file {}: {}",
            path.display(),
            e
        ))
    })?;
    let flat = overrides.flatten();
    tracing::debug!(path = %path.display(), count = flat.len(), "loaded overrides file");
    Ok(flat)
}

/// `NAME=VALUE` pairs coerced to numbers.
fn parse_custom_values(params: &[String]) -> AppResult<BTreeMap<String, f64>> {
    let mut values = BTreeMap::new();
    for raw in params {
        let (name, value) = parse_param(raw)?;
        let number = coerce_value(&name, &value)?;
        values.insert(name, number);
    }
    Ok(values)
}

/// Overrides file first, then `--param` pairs on top.
fn build_request(args: RequestArgs) -> AppResult<SimulationRequest> {
    let mut overrides = match &args.overrides {
        Some(path) => load_overrides(path)?,
        None => BTreeMap::new(),
    };
    for raw in &args.params {
        let (name, value) = parse_param(raw)?;
        overrides.insert(name, value);
    }

    Ok(SimulationRequest::new(
        args.battery_type,
        args.model,
        args.parameter_set,
        args.experiment_type,
    )
    .with_parameters(ParameterOverrides::Flat(overrides)))
}

fn cmd_simulate(service: &SimulationService, args: SimulateArgs) -> AppResult<()> {
    let request = build_request(args.request)?;
    run_and_report(service, &request, args.output.as_deref())
}

fn run_and_report(
    service: &SimulationService,
    request: &SimulationRequest,
    output: Option<&Path>,
) -> AppResult<()> {
    println!(
        "Simulating {} / {} / {} ({})",
        request.battery_type, request.model, request.parameter_set, request.experiment_type
    );

    let mut last_emit = Instant::now();
    let mut last_stage = None;
    let response = service.simulate(
        request,
        Some(&mut |event: RunProgressEvent| {
            let emit_now = last_stage != Some(event.stage) || last_emit.elapsed().as_millis() >= 100;
            if emit_now {
                render_cli_progress(&event);
                last_stage = Some(event.stage);
                last_emit = Instant::now();
            }
        }),
    );
    clear_progress_line();
    let response = response?;

    if response.loaded_from_cache {
        println!("✓ Loaded from cache: {}", response.run_id);
    } else {
        println!("✓ Simulation completed: {}", response.run_id);
    }
    for step in &response.protocol {
        println!("  Step: {}", step);
    }

    let result = &response.result;
    if let Some(cause) = &result.metadata.extraction_error {
        println!("  ! Result degraded: {}", cause);
    }
    let summary = &result.summary;
    println!("  Time points:      {}", result.metadata.total_points);
    println!("  Simulation time:  {:.1} s", summary.simulation_time);
    println!("  Final voltage:    {:.4} V", summary.final_voltage);
    println!("  Average voltage:  {:.4} V", summary.average_voltage);
    println!("  Capacity:         {:.4} A.h", summary.total_capacity);
    println!("  Energy delivered: {:.2} V.A.s", summary.energy_delivered);
    println!("  Wall time:        {:.3} s", response.execution_time_s);

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&response).map_err(|e| {
            AppError::Internal(format!("Failed to serialize result: {}", e))
        })?;
        std::fs::write(path, json)?;
        println!("✓ Wrote result to {}", path.display());
    }

    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(100));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    let spinner = ['|', '/', '-', '\\'];
    let spin_idx = ((event.elapsed_wall_s * 10.0) as usize) % spinner.len();
    let mut line = format!(
        "\r{} {}  elapsed={:.2}s",
        spinner[spin_idx],
        event.stage.label(),
        event.elapsed_wall_s
    );
    if let Some(msg) = &event.message {
        line.push_str(&format!("  {}", msg));
    }
    if event.stage == RunStage::SolverFailed {
        line.push('\n');
    }
    print!("{}", line);
    let _ = io::stdout().flush();
}

fn cmd_runs(service: &SimulationService) -> AppResult<()> {
    let runs = service.list_runs()?;

    if runs.is_empty() {
        println!("No stored runs");
    } else {
        println!("Stored runs:");
        for manifest in runs {
            let request = &manifest.request;
            println!(
                "  {} ({}) {:?} {} / {} / {}",
                manifest.run_id,
                manifest.timestamp,
                manifest.status,
                request.battery_type,
                request.model,
                request.parameter_set
            );
        }
    }
    Ok(())
}

fn cmd_templates(service: &SimulationService) -> AppResult<()> {
    let templates = service.templates()?;
    if templates.is_empty() {
        println!("No saved templates");
        return Ok(());
    }
    println!("Templates:");
    for t in templates {
        println!(
            "  {:<20} {} / {} / {} ({})  {}",
            t.name, t.battery_type, t.model, t.parameter_set, t.experiment_type, t.description
        );
    }
    Ok(())
}

fn cmd_save_template(
    service: &SimulationService,
    name: String,
    description: String,
    args: RequestArgs,
) -> AppResult<()> {
    let request = build_request(args)?;
    let template = SimulationTemplate {
        name,
        description,
        battery_type: request.battery_type,
        model: request.model,
        parameter_set: request.parameter_set,
        experiment_type: request.experiment_type,
        parameters: request.parameters.flatten(),
        created_at: String::new(),
    };
    let saved = service.save_template(template)?;
    println!("✓ Saved template {} ({})", saved.name, saved.created_at);
    Ok(())
}

fn cmd_parameter_sets(service: &SimulationService) -> AppResult<()> {
    let sets = service.parameter_sets()?;
    if sets.is_empty() {
        println!("No saved parameter sets");
        return Ok(());
    }
    println!("Custom parameter sets:");
    for set in sets {
        println!(
            "  {:<20} {} on {}  {}",
            set.name, set.battery_type, set.base_parameter_set, set.description
        );
        for (name, value) in &set.custom_parameters {
            println!("    {} = {}", name, value);
        }
    }
    Ok(())
}

fn cmd_show_run(service: &SimulationService, run_id: &str) -> AppResult<()> {
    println!("Loading run: {}", run_id);

    let (manifest, result) = service.load_run(run_id)?;
    let summary = query::run_summary(&manifest, result.as_ref());

    println!("\nRun Summary:");
    println!("  Request: {}", summary.request);
    println!("  Status: {:?}", summary.status);
    println!("  Engine: {}", manifest.engine);
    println!("  Executed: {} ({:.3} s)", summary.timestamp, manifest.execution_time_s);
    for step in &manifest.protocol {
        println!("  Step: {}", step);
    }
    if let Some(message) = &manifest.error_message {
        println!("  Error: {}", message);
    }
    if !manifest.request.parameters.is_empty() {
        println!("\nOverrides:");
        for (name, value) in &manifest.request.parameters {
            println!("  {} = {}", name, value);
        }
    }
    println!("  Time points: {}", summary.record_count);
    if let Some((t0, t1)) = summary.time_range {
        println!("  Time range: {:.3} - {:.3} s", t0, t1);
    }
    if let Some(s) = summary.summary {
        println!("  Final voltage: {:.4} V", s.final_voltage);
        println!("  Energy delivered: {:.2} V.A.s", s.energy_delivered);
    }
    if summary.degraded {
        println!("  (result degraded)");
    }

    if !summary.variables.is_empty() {
        println!("\nVariables:");
        for name in summary.variables {
            println!("  {}", name);
        }
    }

    Ok(())
}

fn cmd_export_series(
    service: &SimulationService,
    run_id: &str,
    variable: &str,
    output: Option<&Path>,
) -> AppResult<()> {
    let (_manifest, result) = service.load_run(run_id)?;
    let result = result.ok_or_else(|| AppError::RunNotFound(format!("{} has no result", run_id)))?;
    let series = query::extract_series(&result, variable)?;

    // Build CSV
    let mut csv = format!("time_s,{}\n", variable);
    for (t, val) in &series {
        csv.push_str(&format!("{},{}\n", t, val));
    }

    // Write to file or stdout
    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!(
            "✓ Exported {} data points to {}",
            series.len(),
            path.display()
        );
    } else {
        print!("{}", csv);
    }

    Ok(())
}
