mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use composite::{BasisRegistry, CompositeFunction, Function, TaggedValue};
use config::{Config, LogLevel};
use fern::colors::{Color, ColoredLevelConfig};
use log::{LevelFilter, debug, info};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fingerprint-cli", version)]
#[command(about = "Build composite functions out of basis functions, then inspect or evaluate them")]
struct Args {
	/// TOML file with the log level and basis function presets
	#[arg(short, long, global = true)]
	config: Option<PathBuf>,

	/// Log level, overriding the one in the config file
	#[arg(short, long, value_enum, global = true)]
	log_level: Option<LogLevel>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Print the fingerprint and introspection of a composite function
	Inspect(CompositeArgs),
	/// Evaluate a composite function, with one f64 argument per entry parameter after `--`
	Eval {
		#[command(flatten)]
		composite: CompositeArgs,

		#[arg(last = true)]
		values: Vec<f64>,
	},
}

#[derive(clap::Args, Debug)]
struct CompositeArgs {
	/// Basis function at the root, such as `sum:2`, `gaussian:1,0,1` or a preset name
	root: String,

	/// Binds a basis function into entry parameters as `IDX[,IDX..]=BASIS`, applied in order
	#[arg(short, long = "bind", value_parser = parse_bind)]
	binds: Vec<Bind>,
}

#[derive(Clone, Debug, PartialEq)]
struct Bind {
	indices: Vec<usize>,
	basis: String,
}

fn parse_bind(argument: &str) -> Result<Bind, String> {
	let (indices, basis) = argument.split_once('=').ok_or_else(|| format!("`{argument}` is not of the form IDX[,IDX..]=BASIS"))?;
	let indices = indices
		.split(',')
		.map(|index| index.trim().parse::<usize>().map_err(|error| format!("invalid parameter index `{}`: {error}", index.trim())))
		.collect::<Result<Vec<_>, _>>()?;
	let basis = basis.trim();
	if basis.is_empty() {
		return Err(format!("`{argument}` names no basis function"));
	}
	Ok(Bind { indices, basis: basis.to_string() })
}

fn init_logging(level: LevelFilter) -> Result<()> {
	let colors = ColoredLevelConfig::new().debug(Color::Magenta);
	fern::Dispatch::new()
		.chain(std::io::stderr())
		.level(level)
		.format(move |out, message, record| {
			out.finish(format_args!(
				"[{}]{} {}",
				// This will color the log level only, not the whole line. Just a touch.
				colors.color(record.level()),
				chrono::Utc::now().format("[%Y-%m-%d %H:%M:%S]"),
				message
			))
		})
		.apply()
		.context("Failed to install the logger")
}

fn build(registry: &BasisRegistry, args: &CompositeArgs) -> Result<CompositeFunction> {
	let root = registry.resolve(&args.root).with_context(|| format!("Failed to resolve the root `{}`", args.root))?;
	let mut function = Function::from(root);

	for Bind { indices, basis } in &args.binds {
		let leaf = registry.resolve(basis).with_context(|| format!("Failed to resolve `{basis}`"))?;
		let composite = function
			.bind_many(indices, &Function::from(leaf))
			.with_context(|| format!("Failed to bind `{basis}` into parameters {indices:?}"))?;
		info!("Bound `{basis}` into parameters {indices:?}, {} entry parameters remain", composite.entry_param_count());
		function = composite.into();
	}

	Ok(function.into_composite())
}

fn main() -> Result<()> {
	let args = Args::parse();

	let config = match &args.config {
		Some(path) => Config::load(path)?,
		None => Config::default(),
	};
	let level = args.log_level.or(config.log_level).unwrap_or(LogLevel::Warn);
	init_logging(level.into())?;
	debug!("Loaded {} presets", config.presets.len());

	let registry = BasisRegistry::with_presets(config.presets);
	match args.command {
		Command::Inspect(composite) => {
			let composite = build(&registry, &composite)?;
			print!("{composite}");
			println!("{}", composite.introspect());
		}
		Command::Eval { composite, values } => {
			let composite = build(&registry, &composite)?;
			let args: Vec<_> = values.into_iter().map(TaggedValue::F64).collect();
			let result = composite.apply(&args).context("Failed to evaluate the composite function")?;
			println!("{result}");
		}
	}

	Ok(())
}
