// ============================================================================
// tilebreak CLI — batch texture de-repetition via command-line arguments
// ============================================================================
//
// Usage examples:
//   tilebreak --input bricks.png --output wall.png
//   tilebreak -i bricks.png -o wall.jpg --seed 42 --scale 16
//   tilebreak -i "textures/*.png" --output-dir derepeated/ --format png
//   tilebreak -i moss.png -o out.png --grid 8x8 --wrap clamp --size 2048x1024
//
// All processing runs synchronously per file on the current thread; pixel
// rows within one render are rayon-parallel.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use crate::io::{SaveFormat, encode_and_write, load_texture};
use crate::sampler::{RenderParams, WrapMode, render};
use crate::tiling::TileGrid;

// ============================================================================
// CLI argument definition (clap Derive)
// ============================================================================

/// tilebreak — break up visible repetition in tiled textures.
///
/// Samples a tiled source texture through a per-tile randomized coordinate
/// remap and writes the de-repeated result.
#[derive(Parser, Debug)]
#[command(
    name = "tilebreak",
    about = "Randomized-tiling texture sampler",
    long_about = "Re-sample a tiled texture so that each grid cell shows a randomly\n\
                  chosen tile of the source pattern, hiding the periodic repetition.\n\n\
                  Example:\n  \
                  tilebreak --input bricks.png --output wall.png --seed 42\n  \
                  tilebreak -i \"textures/*.png\" --output-dir out/ --scale 16"
)]
pub struct CliArgs {
    /// Input texture file(s). Glob patterns accepted (e.g. "*.png").
    #[arg(short, long, required = true, num_args = 1..)]
    pub input: Vec<String>,

    /// Output file path. Only valid for single-file input.
    /// For batch input use --output-dir instead.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output directory for batch processing.
    /// Files are written here with the original stem and the target format's extension.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output format: png, jpeg, webp, bmp, tga, tiff.
    /// When omitted, inferred from --output's extension, defaulting to png.
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// JPEG quality (1–100, default 90).
    #[arg(short, long, default_value_t = 90, value_name = "1-100")]
    pub quality: u8,

    /// Hash seed selecting which tile each grid cell samples.
    #[arg(long, default_value_t = 333.0)]
    pub seed: f32,

    /// Tiling factor: how many times the texture repeats across the output.
    #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(u32).range(1..=32))]
    pub scale: u32,

    /// Tile layout of the source texture, as COLSxROWS (or one number for
    /// square grids).
    #[arg(long, default_value = "4x4", value_name = "COLSxROWS")]
    pub grid: String,

    /// Texture wrap mode at the pattern boundary: repeat or clamp.
    #[arg(long, default_value = "repeat", value_name = "MODE")]
    pub wrap: String,

    /// Output resolution, as WIDTHxHEIGHT.
    #[arg(long, default_value = "1024x1024", value_name = "WxH")]
    pub size: String,

    /// Print per-file timing information.
    #[arg(short, long)]
    pub verbose: bool,
}

// ============================================================================
// Public entry point
// ============================================================================

/// Run all CLI processing and return an OS exit code.
/// `0` = all files succeeded, `1` = one or more files failed.
pub fn run(args: CliArgs) -> ExitCode {
    // Resolve glob patterns / literal paths → concrete PathBufs
    let inputs = resolve_inputs(&args.input);
    if inputs.is_empty() {
        eprintln!("error: no input files matched the given pattern(s).");
        return ExitCode::FAILURE;
    }

    // Multiple inputs require --output-dir, not --output
    if inputs.len() > 1 && args.output.is_some() && args.output_dir.is_none() {
        eprintln!(
            "error: {} input files given but --output only accepts a single file path.\n\
             Use --output-dir to specify a destination directory for batch processing.",
            inputs.len()
        );
        return ExitCode::FAILURE;
    }

    // Parse render settings up front so bad arguments fail before any I/O
    let grid: TileGrid = match args.grid.parse() {
        Ok(g) => g,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let wrap = match args.wrap.to_lowercase().as_str() {
        "clamp" => WrapMode::Clamp,
        "repeat" => WrapMode::Repeat,
        other => {
            eprintln!("error: unknown wrap mode '{}': expected repeat or clamp.", other);
            return ExitCode::FAILURE;
        }
    };
    let (width, height) = match parse_size(&args.size) {
        Some(dims) => dims,
        None => {
            eprintln!(
                "error: cannot parse --size '{}': expected WIDTHxHEIGHT, e.g. 1024x1024.",
                args.size
            );
            return ExitCode::FAILURE;
        }
    };
    let params = RenderParams {
        seed: args.seed,
        uniform_scale: args.scale,
        grid,
        wrap,
    };

    let save_format = parse_format(args.format.as_deref(), args.output.as_deref());

    // Create output directory if specified
    if let Some(dir) = &args.output_dir {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!(
                "error: could not create output directory '{}': {}",
                dir.display(),
                e
            );
            return ExitCode::FAILURE;
        }
    }

    crate::log_info!(
        "batch start: {} file(s), seed {}, scale {}, grid {}, {:?} wrap, {}x{}",
        inputs.len(), params.seed, params.uniform_scale, grid, wrap, width, height
    );

    let total = inputs.len();
    let multi = total > 1;
    let mut any_failure = false;

    for (idx, input_path) in inputs.iter().enumerate() {
        if multi || args.verbose {
            println!("[{}/{}] {}", idx + 1, total, input_path.display());
        }

        let file_start = Instant::now();

        // Determine output path
        let output_path = match build_output_path(
            input_path,
            args.output.as_deref(),
            args.output_dir.as_deref(),
            save_format,
        ) {
            Some(p) => p,
            None => {
                eprintln!(
                    "  error: cannot determine output path for '{}'.",
                    input_path.display()
                );
                any_failure = true;
                continue;
            }
        };

        match run_one(
            input_path,
            &output_path,
            width,
            height,
            &params,
            save_format,
            args.quality,
        ) {
            Ok(()) => {
                if args.verbose || multi {
                    println!(
                        "  → {} ({:.0}ms)",
                        output_path.display(),
                        file_start.elapsed().as_secs_f64() * 1000.0
                    );
                }
            }
            Err(e) => {
                eprintln!("  error: {}", e);
                crate::log_err!("{}: {}", input_path.display(), e);
                any_failure = true;
            }
        }
    }

    if any_failure { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}

// ============================================================================
// Per-file processing pipeline
// ============================================================================

fn run_one(
    input: &Path,
    output: &Path,
    width: u32,
    height: u32,
    params: &RenderParams,
    format: SaveFormat,
    quality: u8,
) -> Result<(), String> {
    // -- Step 1: Load the tiled source texture --------------------------
    let texture = load_texture(input).map_err(|e| format!("load failed: {}", e))?;

    // -- Step 2: Render through the randomized tile remap ----------------
    let result = render(&texture, width, height, params);

    // -- Step 3: Save ----------------------------------------------------
    encode_and_write(&result, output, format, quality)
        .map_err(|e| format!("save failed: {}", e))?;

    crate::log_info!(
        "{} ({}x{}) → {} ({}x{})",
        input.display(), texture.width(), texture.height(),
        output.display(), width, height
    );
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

/// Expand glob patterns and literal paths into a deduplicated, ordered list.
fn resolve_inputs(patterns: &[String]) -> Vec<PathBuf> {
    let mut result: Vec<PathBuf> = Vec::new();

    for pattern in patterns {
        let as_path = Path::new(pattern);

        if as_path.exists() {
            // Literal path — use directly
            if !result.iter().any(|p| p.as_path() == as_path) {
                result.push(as_path.to_path_buf());
            }
            continue;
        }

        // Treat as glob pattern
        match glob::glob(pattern) {
            Ok(entries) => {
                let mut matched = false;
                for entry in entries.flatten() {
                    if !result.contains(&entry) {
                        result.push(entry);
                    }
                    matched = true;
                }
                if !matched {
                    eprintln!("warning: pattern '{}' matched no files.", pattern);
                }
            }
            Err(e) => {
                eprintln!("warning: invalid glob '{}': {}", pattern, e);
            }
        }
    }

    result
}

/// Choose the [`SaveFormat`] from the `--format` string or infer it from the
/// output file extension. Defaults to PNG when neither is known.
fn parse_format(format_arg: Option<&str>, output: Option<&Path>) -> SaveFormat {
    if let Some(f) = format_arg {
        return SaveFormat::from_name(f).unwrap_or_default();
    }

    if let Some(out) = output {
        let ext = out.extension().and_then(|e| e.to_str()).unwrap_or("");
        return SaveFormat::from_name(ext).unwrap_or_default();
    }

    SaveFormat::default()
}

/// Parse a `WIDTHxHEIGHT` resolution string; both dimensions must be >= 1.
fn parse_size(s: &str) -> Option<(u32, u32)> {
    let (w, h) = s.trim().split_once(['x', 'X'])?;
    let w = w.trim().parse::<u32>().ok()?;
    let h = h.trim().parse::<u32>().ok()?;
    if w == 0 || h == 0 {
        return None;
    }
    Some((w, h))
}

/// Compute the output path for a single input file.
///
/// Priority:
/// 1. `--output` (explicit path, used for single-file input)
/// 2. `--output-dir` (batch directory, derives filename from input stem)
/// 3. Fallback: same directory as input, same stem, new extension
///    (appends `_out` to stem if it would collide with the input path)
fn build_output_path(
    input: &Path,
    output: Option<&Path>,
    output_dir: Option<&Path>,
    format: SaveFormat,
) -> Option<PathBuf> {
    // Explicit output path
    if let Some(out) = output {
        return Some(out.to_path_buf());
    }

    let ext = format.extension();
    let stem = input.file_stem()?.to_string_lossy().into_owned();

    if let Some(dir) = output_dir {
        return Some(dir.join(format!("{}.{}", stem, ext)));
    }

    // Write next to the input file
    let parent = input.parent().unwrap_or(Path::new("."));
    let candidate = parent.join(format!("{}.{}", stem, ext));

    // Avoid silent overwrite of the input
    if candidate == input {
        Some(parent.join(format!("{}_out.{}", stem, ext)))
    } else {
        Some(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_parsing() {
        assert_eq!(parse_size("1024x1024"), Some((1024, 1024)));
        assert_eq!(parse_size("2048X512"), Some((2048, 512)));
        assert_eq!(parse_size("0x512"), None);
        assert_eq!(parse_size("1024"), None);
        assert_eq!(parse_size("axb"), None);
    }

    #[test]
    fn format_inference_prefers_explicit_flag() {
        let out = PathBuf::from("result.jpg");
        assert_eq!(parse_format(Some("webp"), Some(&out)), SaveFormat::Webp);
        assert_eq!(parse_format(None, Some(&out)), SaveFormat::Jpeg);
        assert_eq!(parse_format(None, None), SaveFormat::Png);
        // Unknown names fall back to PNG rather than failing the batch
        assert_eq!(parse_format(Some("exr"), None), SaveFormat::Png);
    }

    #[test]
    fn output_path_derivation() {
        let input = Path::new("textures/bricks.png");

        // Explicit --output wins
        assert_eq!(
            build_output_path(input, Some(Path::new("wall.webp")), None, SaveFormat::Png),
            Some(PathBuf::from("wall.webp"))
        );

        // --output-dir derives from the input stem
        assert_eq!(
            build_output_path(input, None, Some(Path::new("out")), SaveFormat::Jpeg),
            Some(PathBuf::from("out/bricks.jpg"))
        );

        // Fallback next to the input; same-extension collision gets _out
        assert_eq!(
            build_output_path(input, None, None, SaveFormat::Png),
            Some(PathBuf::from("textures/bricks_out.png"))
        );
        assert_eq!(
            build_output_path(input, None, None, SaveFormat::Tga),
            Some(PathBuf::from("textures/bricks.tga"))
        );
    }
}
