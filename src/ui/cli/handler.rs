// Thu Oct 15 2026 - Alex

use super::args::{Args, Command, DumpArgs, ImagesArgs, OffsetArgs, RunArgs};
use crate::config::Config;
use crate::dump::FileExporter;
use crate::image::{maps, ImageLocator, ImageSelector, ImageTable};
use crate::memory::ProcessMemory;
use crate::output::{ReportFormat, ReportGenerator};
use crate::reflection::SymbolTableRegistry;
use crate::symbol::OffsetResolver;
use crate::ui::banner::Banner;
use crate::ui::progress::ProgressManager;
use crate::ui::{print_info, print_success, print_warning};
use crate::utils::{format_bytes, format_duration, measure_time, LoggingUtils};
use crate::workflow::{load_registry, Procedure};
use anyhow::Context;
use log::warn;

pub struct CommandHandler {
    quiet: bool,
}

impl CommandHandler {
    pub fn new() -> Self {
        Self { quiet: false }
    }

    pub fn execute(mut self, args: Args) -> anyhow::Result<()> {
        self.quiet = args.quiet;

        if args.no_color {
            colored::control::set_override(false);
        }

        self.setup_logging(&args);

        if !self.quiet {
            Banner::default().print();
        }

        let mut config = match &args.config {
            Some(path) => Config::load(path).with_context(|| format!("Failed to load config {:?}", path))?,
            None => Config::default(),
        };
        if let Some(pid) = args.pid {
            config.pid = Some(pid);
        }
        config.validate()?;

        match args.command {
            Command::Images(images_args) => self.handle_images(&config, images_args),
            Command::Dump(dump_args) => self.handle_dump(config, dump_args),
            Command::Offset(offset_args) => self.handle_offset(config, offset_args),
            Command::Run(run_args) => self.handle_run(&config, run_args),
        }
    }

    fn setup_logging(&self, args: &Args) {
        LoggingUtils::init(LoggingUtils::effective_level(&args.log_level, args.quiet));
    }

    fn info(&self, message: &str) {
        if !self.quiet {
            print_info(message);
        }
    }

    fn success(&self, message: &str) {
        if !self.quiet {
            print_success(message);
        }
    }

    fn load_table(&self, config: &Config) -> anyhow::Result<ImageTable> {
        let pid = config.target_pid();
        self.info(&format!("Reading image table of process {}", pid));
        let table = maps::from_process(pid).with_context(|| format!("Failed to read images of process {}", pid))?;
        self.success(&format!("Found {} loaded images", table.len()));
        Ok(table)
    }

    fn handle_images(&self, config: &Config, args: ImagesArgs) -> anyhow::Result<()> {
        let table = self.load_table(config)?;
        let format = if args.json { ReportFormat::Json } else { ReportFormat::Text };
        let listing = ReportGenerator::new(format).generate_images(&table)?;
        print!("{}", listing);
        if args.json {
            println!();
        }
        Ok(())
    }

    fn handle_dump(&self, mut config: Config, args: DumpArgs) -> anyhow::Result<()> {
        args.validate().map_err(|e| anyhow::anyhow!(e))?;

        if let Some(select) = &args.select {
            config.selector = select.parse::<ImageSelector>()?;
        }
        if let Some(out) = args.out {
            config = config.with_output_dir(out);
        }
        if args.name.is_some() {
            config.file_name = args.name;
        }
        config.strict |= args.strict;
        config.overwrite |= args.overwrite;
        config.targets.clear();

        let table = self.load_table(&config)?;
        let memory = ProcessMemory::attach(config.target_pid()).context("Failed to open process memory")?;
        let mut exporter = FileExporter::new(&config.output_dir).with_overwrite(config.overwrite);

        let progress = ProgressManager::new().with_enabled(!self.quiet);
        let pb = progress.create_bytes_progress("Dumping");

        self.info(&format!("Dumping image selected by '{}'", config.selector));
        let (result, elapsed) = measure_time(|| {
            Procedure::new(&config, &table, &memory)
                .with_progress(pb.clone())
                .run(&mut exporter)
        });
        let report = result?;

        self.success(&format!(
            "Dumped {} of {} from {} in {}",
            format_bytes(report.dumped),
            format_bytes(report.requested),
            report.image.path().display(),
            format_duration(elapsed)
        ));
        if !report.complete {
            print_warning(&format!(
                "Dump is partial, stopped at {}",
                report.stopped_at.map(|a| a.to_string()).unwrap_or_else(|| "?".to_string())
            ));
        }
        if let Some(location) = &report.export.location {
            self.success(&format!("Written to {} ({})", location.display(), report.export.mime_type));
        }
        Ok(())
    }

    fn handle_offset(&self, mut config: Config, args: OffsetArgs) -> anyhow::Result<()> {
        args.validate().map_err(|e| anyhow::anyhow!(e))?;

        if let Some(select) = &args.select {
            config.selector = select.parse::<ImageSelector>()?;
        }
        if args.symbols.is_some() {
            config.symbols_file = args.symbols;
        }

        let table = self.load_table(&config)?;
        let image = ImageLocator::new(config.selector.clone()).locate(&table)?;
        self.info(&format!("Reading symbols for {}", image));

        let registry = load_registry(&config, &image).context("Failed to load symbol table")?;
        self.success(&format!(
            "Loaded {} methods from {}",
            registry.method_count(),
            registry.path().display()
        ));
        let resolved = OffsetResolver::new(&registry, &table).resolve(&args.class, &args.method)?;

        if args.json {
            println!("{}", serde_json::to_string_pretty(&resolved)?);
        } else {
            self.success(&resolved.to_string());
            println!("0x{:x}", resolved.offset);
        }
        Ok(())
    }

    fn handle_run(&self, config: &Config, args: RunArgs) -> anyhow::Result<()> {
        let table = self.load_table(config)?;
        let memory = ProcessMemory::attach(config.target_pid()).context("Failed to open process memory")?;
        let mut exporter = FileExporter::new(&config.output_dir).with_overwrite(config.overwrite);

        let registry = self.registry_for_targets(config, &table);

        let progress = ProgressManager::new().with_enabled(!self.quiet && !args.json);
        let mut procedure = Procedure::new(config, &table, &memory)
            .with_progress(progress.create_bytes_progress("Dumping"));
        if let Some(registry) = &registry {
            procedure = procedure.with_registry(registry);
        }
        let report = procedure.run(&mut exporter)?;

        let format = if args.json { ReportFormat::Json } else { ReportFormat::Text };
        let rendered = ReportGenerator::new(format).generate(&report)?;
        println!("{}", rendered);

        if !report.is_clean() && !args.json {
            print_warning(&format!(
                "Finished with {} unresolved targets{}",
                report.failures.len(),
                if report.complete { "" } else { " and a partial dump" }
            ));
        }
        Ok(())
    }

    fn registry_for_targets(&self, config: &Config, table: &ImageTable) -> Option<SymbolTableRegistry> {
        if config.targets.is_empty() {
            return None;
        }
        let image = ImageLocator::new(config.selector.clone()).locate(table).ok()?;
        match load_registry(config, &image) {
            Ok(registry) => Some(registry),
            Err(e) => {
                warn!("symbol table unavailable for {}: {}", image.path().display(), e);
                None
            }
        }
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new()
    }
}
