use image::GenericImageView;
use std::env;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Panel geometry of the 7.5" UC8179 panel
const PANEL_WIDTH: u32 = 800;
const PANEL_HEIGHT: u32 = 480;

/// Convert a PNG image to a packed 1bpp frame at build time
///
/// The frame uses the same layout as the display framebuffer: row-major, MSB first,
/// a set bit is a black pixel.
fn convert_image_to_frame(
    input_path: &str,
    output_path: &str,
    threshold: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed={}", input_path);

    if !Path::new(input_path).exists() {
        println!(
            "cargo:warning=Image file '{}' not found, no splash image",
            input_path
        );
        // Create empty file so include_bytes! still works
        File::create(output_path)?;
        return Ok(());
    }

    let img = image::open(input_path)?;
    let (orig_width, orig_height) = img.dimensions();

    // Fit inside the panel, preserving aspect ratio
    let orig_ratio = orig_width as f32 / orig_height as f32;
    let panel_ratio = PANEL_WIDTH as f32 / PANEL_HEIGHT as f32;
    let (new_width, new_height) = if orig_ratio > panel_ratio {
        (PANEL_WIDTH, (PANEL_WIDTH as f32 / orig_ratio) as u32)
    } else {
        ((PANEL_HEIGHT as f32 * orig_ratio) as u32, PANEL_HEIGHT)
    };

    let gray = img
        .resize(new_width, new_height, image::imageops::FilterType::Lanczos3)
        .to_luma8();

    let bytes_per_row = PANEL_WIDTH.div_ceil(8);
    let mut buffer = vec![0u8; (bytes_per_row * PANEL_HEIGHT) as usize];

    // Centered on a white background
    let offset_x = (PANEL_WIDTH - new_width) / 2;
    let offset_y = (PANEL_HEIGHT - new_height) / 2;

    for y in 0..new_height {
        for x in 0..new_width {
            if gray.get_pixel(x, y)[0] < threshold {
                let (px, py) = (x + offset_x, y + offset_y);
                let byte_index = (py * bytes_per_row + px / 8) as usize;
                buffer[byte_index] |= 0x80 >> (px % 8);
            }
        }
    }

    let mut file = File::create(output_path)?;
    file.write_all(&buffer)?;

    println!(
        "cargo:warning=Splash {}x{} -> {} byte frame",
        orig_width,
        orig_height,
        buffer.len()
    );
    Ok(())
}

fn main() {
    if env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    let splash_output = format!("{}/splash.bin", out_dir);

    if let Err(e) = convert_image_to_frame(
        "splash.png",
        &splash_output,
        128, // threshold (0-255, 128 = middle gray)
    ) {
        println!("cargo:warning=Failed to convert splash.png: {}", e);
        let _ = File::create(&splash_output);
    }
}
