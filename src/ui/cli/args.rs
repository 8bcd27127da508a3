// Thu Oct 15 2026 - Alex

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "image-dumper")]
#[command(author = "Alex")]
#[command(version)]
#[command(about = "Locate, dump and resolve method offsets in loaded images", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true, default_value = "info")]
    pub log_level: String,

    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[arg(long, global = true)]
    pub no_color: bool,

    /// JSON config file; command line flags override its values.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Target process. Defaults to this process.
    #[arg(short, long, global = true)]
    pub pid: Option<i32>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List loaded images.
    Images(ImagesArgs),
    /// Dump one image to a file.
    Dump(DumpArgs),
    /// Resolve the image offset of one method.
    Offset(OffsetArgs),
    /// Run locate, dump, export and resolve from the config.
    Run(RunArgs),
}

#[derive(Parser, Debug)]
pub struct ImagesArgs {
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct DumpArgs {
    /// first | main | path:<p> | name:<n> | contains:<s> | regex:<re>
    #[arg(short, long)]
    pub select: Option<String>,

    #[arg(short, long)]
    pub out: Option<PathBuf>,

    #[arg(short, long)]
    pub name: Option<String>,

    #[arg(long)]
    pub strict: bool,

    #[arg(long)]
    pub overwrite: bool,
}

#[derive(Parser, Debug)]
pub struct OffsetArgs {
    pub class: String,

    pub method: String,

    #[arg(short, long)]
    pub select: Option<String>,

    #[arg(long)]
    pub symbols: Option<PathBuf>,

    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    #[arg(long)]
    pub json: bool,
}

impl DumpArgs {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.name {
            if name.is_empty() || name.contains('/') {
                return Err(format!("Invalid file name: {:?}", name));
            }
        }
        Ok(())
    }
}

impl OffsetArgs {
    pub fn validate(&self) -> Result<(), String> {
        if self.class.trim().is_empty() {
            return Err("Class name must not be empty".to_string());
        }
        if self.method.trim().is_empty() {
            return Err("Method name must not be empty".to_string());
        }
        if let Some(symbols) = &self.symbols {
            if !symbols.exists() {
                return Err(format!("Symbols file does not exist: {:?}", symbols));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dump_with_globals() {
        let args = Args::try_parse_from([
            "image-dumper", "dump", "--select", "name:libc.so.6", "--strict", "--pid", "42", "-q",
        ])
        .unwrap();
        assert_eq!(args.pid, Some(42));
        assert!(args.quiet);
        match args.command {
            Command::Dump(dump) => {
                assert_eq!(dump.select.as_deref(), Some("name:libc.so.6"));
                assert!(dump.strict);
                assert!(!dump.overwrite);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_offset() {
        let args = Args::try_parse_from(["image-dumper", "offset", "Sandbox", "evaluate:", "--json"]).unwrap();
        match args.command {
            Command::Offset(offset) => {
                assert_eq!(offset.class, "Sandbox");
                assert_eq!(offset.method, "evaluate:");
                assert!(offset.json);
                assert!(offset.validate().is_ok());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_dump_name_validation() {
        let args = DumpArgs {
            select: None,
            out: None,
            name: Some("../x".to_string()),
            strict: false,
            overwrite: false,
        };
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_missing_subcommand_fails() {
        assert!(Args::try_parse_from(["image-dumper"]).is_err());
    }
}
