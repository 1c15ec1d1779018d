use clap::Parser;
use image::{ImageBuffer, Rgba};
use std::path::{Path, PathBuf};

use frame_resizer::error::AppError;
use frame_resizer::plugin_loader::Plugin;
use frame_resizer::{
    DataType, FrameBuffer, FrameResizer, PixelFormat, Resize, ResizeOptions, ResizeRequest,
};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "frame_resizer")]
struct Args {
    /// path to input image
    #[arg(long)]
    input: String,

    /// path to output image, or a .raw file for the bare buffer
    #[arg(long)]
    output: String,

    /// path to TOML params file
    #[arg(long)]
    params: String,

    /// convert the decoded input to this format before resizing (e.g. nv12)
    #[arg(long)]
    source_format: Option<PixelFormat>,

    /// plugin name without extension (e.g. resize_plugin); built-in resizer if unset
    #[arg(long)]
    plugin: Option<String>,

    /// directory with plugins (default target/debug)
    #[arg(long, default_value = "target/debug")]
    plugin_path: String,
}

fn lib_filename(plugin_name: &str) -> String {
    if cfg!(target_os = "windows") {
        format!("{plugin_name}.dll")
    } else if cfg!(target_os = "macos") {
        format!("lib{plugin_name}.dylib")
    } else {
        format!("lib{plugin_name}.so")
    }
}

fn load_resizer(args: &Args) -> Result<Box<dyn Resize>, AppError> {
    let Some(name) = &args.plugin else {
        return Ok(Box::new(FrameResizer::new()));
    };

    let mut plugin_path = PathBuf::from(&args.plugin_path);
    plugin_path.push(lib_filename(name));

    if !plugin_path.exists() {
        return Err(AppError::MissingPlugin(plugin_path.display().to_string()));
    }
    tracing::info!(plugin = %plugin_path.display(), "loading resize plugin");

    // SAFETY:
    // - We only load from a path we constructed and checked exists.
    // - `Plugin::load` is unsafe because Rust can't verify at compile time that the loaded
    //   dynamic library exports the expected symbols with the expected ABI/signature.
    // - If the library is not compatible (wrong symbol, wrong signature, wrong ABI),
    //   calling through the obtained function pointers would be Undefined Behavior.
    let plugin = unsafe { Plugin::load(&plugin_path)? };
    Ok(Box::new(plugin))
}

fn to_rgba_image(
    frame: &FrameBuffer,
    resizer: &dyn Resize,
) -> Result<ImageBuffer<Rgba<u8>, Vec<u8>>, AppError> {
    if frame.data_type() != DataType::Uint8 {
        return Err(AppError::Unencodable(format!("{:?}", frame.data_type())));
    }
    let request = ResizeRequest::scale(
        frame.as_frame_ref(),
        frame.width(),
        frame.height(),
        PixelFormat::Rgba,
    );
    let rgba = resizer.resize(&request)?;
    let (width, height) = (rgba.width(), rgba.height());
    ImageBuffer::from_raw(width, height, rgba.into_data())
        .ok_or_else(|| AppError::Unencodable(PixelFormat::Rgba.to_string()))
}

fn main() -> Result<(), AppError> {
    init_tracing();

    let args = Args::parse();

    if !Path::new(&args.input).exists() {
        return Err(AppError::MissingInput(args.input));
    }
    if !Path::new(&args.params).exists() {
        return Err(AppError::MissingParams(args.params));
    }

    let params_bytes = std::fs::read(&args.params)?;
    let params_str =
        std::str::from_utf8(&params_bytes).map_err(|_| AppError::InvalidParamsUtf8)?;
    let options = ResizeOptions::from_toml_str(params_str)?;

    let img = image::open(&args.input)?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut source = FrameBuffer::packed(width, height, PixelFormat::Rgba, rgba.into_raw())?;

    let resizer = load_resizer(&args)?;

    if let Some(format) = args.source_format {
        let request = ResizeRequest::scale(source.as_frame_ref(), width, height, format);
        source = resizer.resize(&request)?;
    }

    tracing::info!(
        width,
        height,
        source_format = %source.format(),
        input_file = args.input,
        "frame resizing.."
    );

    let output = resizer.resize(&ResizeRequest::new(source.as_frame_ref(), options))?;

    if args.output.ends_with(".raw") {
        std::fs::write(&args.output, output.data())?;
    } else {
        to_rgba_image(&output, resizer.as_ref())?.save(&args.output)?;
    }

    tracing::info!(
        output_file = args.output,
        width = output.width(),
        height = output.height(),
        format = %output.format(),
        "output file saved"
    );

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();
}
