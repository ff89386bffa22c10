//! afpdf CLI - AFP record stream interpretation tool

use std::fmt;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use afpdf::{
    dump_font, load_resources, Charset, InterpretOptions, Interpreter, JsonFormat,
    JsonRecordSource, RecordSource, RecordingComposer,
};

/// Input could not be opened.
const EXIT_INPUT: i32 = 1;
/// Output could not be created.
const EXIT_OUTPUT: i32 = 2;
/// Interpretation failed.
const EXIT_INTERPRET: i32 = 3;
/// Output could not be written or closed.
const EXIT_WRITE: i32 = 4;
/// Bad command line.
const EXIT_USAGE: i32 = 5;

#[derive(Parser)]
#[command(name = "afpdf")]
#[command(version)]
#[command(about = "Interpret AFP record streams: fonts, text, rules and images", long_about = None)]
struct Cli {
    /// EBCDIC character set of code points and text
    #[arg(long, value_enum, global = true, default_value = "cp500")]
    charset: CharsetArg,

    /// Code page used when a font refers to an unknown one
    #[arg(long, global = true, env = "AFPDF_DEFAULT_CODE_PAGE")]
    default_code_page: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interpret a record stream and write the composition instructions
    Convert {
        /// Input record stream (JSON lines)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file for the composition instructions
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Dump the reconstructed raster fonts
    Fonts {
        /// Input record stream (JSON lines)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output directory (stdout if not specified)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Show document information
    Info {
        /// Input record stream (JSON lines)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Print the information as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum CharsetArg {
    /// EBCDIC international (code page 500)
    Cp500,
    /// EBCDIC US/Canada (code page 37)
    Cp037,
}

impl From<CharsetArg> for Charset {
    fn from(arg: CharsetArg) -> Self {
        match arg {
            CharsetArg::Cp500 => Charset::Cp500,
            CharsetArg::Cp037 => Charset::Cp037,
        }
    }
}

/// A failed command with the exit code it maps to.
#[derive(Debug)]
struct Failure {
    code: i32,
    message: String,
}

impl Failure {
    fn new(code: i32, context: impl fmt::Display, err: impl fmt::Display) -> Self {
        Self {
            code,
            message: format!("{}: {}", context, err),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

type CmdResult = Result<(), Failure>;

fn main() {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            process::exit(EXIT_USAGE);
        }
        Err(e) => {
            // --help and --version
            let _ = e.print();
            return;
        }
    };

    let mut options = InterpretOptions::new().with_charset(cli.charset.into());
    if let Some(name) = cli.default_code_page {
        options = options.with_default_code_page(name);
    }

    let result = match cli.command {
        Commands::Convert {
            input,
            output,
            compact,
        } => cmd_convert(&input, &output, compact, options),
        Commands::Fonts { input, output } => cmd_fonts(&input, output.as_deref(), options),
        Commands::Info { input, json } => cmd_info(&input, json, options),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(failure) = result {
        eprintln!("{}: {}", "Error".red().bold(), failure);
        process::exit(failure.code);
    }
}

fn open_file(input: &Path) -> Result<BufReader<File>, Failure> {
    let file = File::open(input).map_err(|e| {
        let context = format!("Problem with input file {}", input.display());
        Failure::new(EXIT_INPUT, context, e)
    })?;
    Ok(BufReader::new(file))
}

fn open_input(input: &Path) -> Result<JsonRecordSource<BufReader<File>>, Failure> {
    Ok(JsonRecordSource::new(open_file(input)?))
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let template = "{spinner:.green} {msg} {pos} records";
    if let Ok(style) = ProgressStyle::default_spinner().template(template) {
        pb.set_style(style);
    }
    pb
}

fn cmd_convert(
    input: &Path,
    output: &Path,
    compact: bool,
    options: InterpretOptions,
) -> CmdResult {
    let mut source = open_input(input)?;
    let out = File::create(output).map_err(|e| {
        let context = format!("Problem with output file {}", output.display());
        Failure::new(EXIT_OUTPUT, context, e)
    })?;

    let pb = spinner();
    pb.set_message("Interpreting");

    let mut interpreter = Interpreter::with_options(RecordingComposer::new(), options);
    loop {
        let record = source
            .next_record()
            .map_err(|e| Failure::new(EXIT_INTERPRET, "Problem interpreting input", e))?;
        let Some(record) = record else {
            break;
        };
        interpreter.process(&record).map_err(|e| {
            let context = format!("Problem interpreting {}", record.kind());
            Failure::new(EXIT_INTERPRET, context, e)
        })?;
        pb.inc(1);
    }
    pb.finish_with_message("Done!");

    let (session, composer) = interpreter
        .finish()
        .map_err(|e| Failure::new(EXIT_WRITE, "Problem closing output", e))?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = composer
        .to_json(format)
        .map_err(|e| Failure::new(EXIT_WRITE, "Problem writing output", e))?;
    let mut writer = BufWriter::new(out);
    writer
        .write_all(json.as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| {
            let context = format!("Problem writing {}", output.display());
            Failure::new(EXIT_WRITE, context, e)
        })?;

    println!(
        "{} {} ({} pages, {} fonts)",
        "Saved to".green(),
        output.display(),
        session.page_count(),
        session.fonts().len()
    );
    print_warnings(&session);
    Ok(())
}

fn cmd_fonts(input: &Path, output: Option<&Path>, options: InterpretOptions) -> CmdResult {
    let session = load_resources(open_file(input)?, options)
        .map_err(|e| Failure::new(EXIT_INTERPRET, "Problem interpreting input", e))?;

    match output {
        Some(dir) => {
            fs::create_dir_all(dir).map_err(|e| {
                let context = format!("Problem with output directory {}", dir.display());
                Failure::new(EXIT_OUTPUT, context, e)
            })?;
            for (i, font) in session.fonts().iter().enumerate() {
                let filename = format!("font-{}.txt", i + 1);
                fs::write(dir.join(&filename), dump_font(font)).map_err(|e| {
                    Failure::new(EXIT_WRITE, format!("Problem writing {}", filename), e)
                })?;
                println!("{} {}", "Dumped".green(), filename);
            }
            println!(
                "\n{} {} fonts dumped",
                "Done!".green().bold(),
                session.fonts().len()
            );
        }
        None => {
            for (i, font) in session.fonts().iter().enumerate() {
                println!("{}", format!("Font {}", i + 1).cyan().bold());
                println!("{}", "─".repeat(40).dimmed());
                println!("{}", dump_font(font));
            }
        }
    }
    print_warnings(&session);
    Ok(())
}

fn cmd_info(input: &Path, json: bool, options: InterpretOptions) -> CmdResult {
    let source = open_input(input)?;
    let mut interpreter = Interpreter::with_options(RecordingComposer::new(), options);
    interpreter
        .run(source)
        .map_err(|e| Failure::new(EXIT_INTERPRET, "Problem interpreting input", e))?;
    let records = interpreter.records_processed();
    let (session, composer) = interpreter.into_parts();

    let glyphs: usize = session.fonts().iter().map(|f| f.glyph_count()).sum();
    let mapped: usize = session
        .fonts()
        .iter()
        .map(|f| f.mapped_glyphs().count())
        .sum();

    if json {
        let info = serde_json::json!({
            "file": input.display().to_string(),
            "records": records,
            "pages": session.page_count(),
            "media": session.medium_count(),
            "code_pages": session.code_pages().len(),
            "fonts": session.fonts().len(),
            "glyphs": glyphs,
            "mapped_glyphs": mapped,
            "commands": composer.commands().len(),
            "warnings": session.warnings().iter().map(|w| w.to_string()).collect::<Vec<_>>(),
        });
        println!("{:#}", info);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Records".bold(), records);
    println!("{}: {}", "Pages".bold(), session.page_count());
    println!("{}: {}", "Media".bold(), session.medium_count());
    println!("{}: {}", "Code pages".bold(), session.code_pages().len());
    println!("{}: {}", "Fonts".bold(), session.fonts().len());

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Glyphs".bold(), glyphs);
    println!("{}: {}", "Mapped glyphs".bold(), mapped);
    println!("{}: {}", "Instructions".bold(), composer.commands().len());
    println!("{}: {}", "Warnings".bold(), session.warnings().len());

    Ok(())
}

fn print_warnings(session: &afpdf::Session) {
    for warning in session.warnings() {
        eprintln!("{}: {}", "Warning".yellow().bold(), warning);
    }
}

fn cmd_version() {
    println!("{} {}", "afpdf".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("AFP record stream interpretation tool");
    println!();
    println!("License: MIT");
}
