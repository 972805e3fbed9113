// Синтетический поток кадров: каждый код держится в кадре N кадров,
// углы слегка «дрожат». Печатает, что отдаёт дедупликатор на каждом кадре.
//
//   cargo run --bin scan_synthetic -- --codes A,A,B,A --frames 1
//   cargo run --bin scan_synthetic -- --codes 5901234123457 --frames 30 --symbology ean13

use anyhow::Result;
use clap::Parser;
use ultrascan::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "scan_synthetic", about = "Feed a synthetic frame stream through the de-duplicator")]
struct Args {
    /// Comma-separated payloads, in the order they enter the frame.
    #[arg(long, value_delimiter = ',', default_value = "A,A,B,A")]
    codes: Vec<String>,

    /// Frames each payload stays in view.
    #[arg(long, default_value_t = 3)]
    frames: usize,

    #[arg(long, default_value = "qr")]
    symbology: Symbology,

    /// Report every frame, not only the new codes.
    #[arg(long)]
    verbose: bool,
}

fn synth_quad(frame: usize) -> Quad {
    // дрожание ±2px по простому ЛКГ, чтобы вывод был воспроизводимым
    let seed = u32::try_from(frame % 1024).unwrap_or(0);
    let j = f64::from(seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223) >> 30) - 2.0;
    Quad {
        p0: Point::new(40.0 + j, 40.0),
        p1: Point::new(200.0 + j, 40.0 - j),
        p2: Point::new(200.0, 200.0 + j),
        p3: Point::new(40.0 - j, 200.0),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut dedup = ScanDeduplicator::default();

    let mut frame = 0usize;
    for code in &args.codes {
        for _ in 0..args.frames.max(1) {
            let event = DetectionEvent::new(code.clone(), args.symbology).with_quad(synth_quad(frame));
            let out = dedup.on_detected(event);
            match &out.new_code {
                Some(p) => println!(
                    "frame {frame:>4}: NEW {p:?} (#{})",
                    dedup.session().detection_count()
                ),
                None if args.verbose => println!("frame {frame:>4}: -"),
                None => {}
            }
            frame += 1;
        }
    }

    println!(
        "frames: {frame}, distinct reports: {}",
        dedup.session().detection_count()
    );
    Ok(())
}
