//! Key-repeat acceleration example
//!
//! Shows how debounced rewind/fast-forward bursts turn into seek speeds.
//!
//! Run with: cargo run -p overlay-core --example key_acceleration

use overlay_core::{Direction, KeyRepeatAccelerator};

fn main() {
    println!("Overlay Core - Key Acceleration Example");
    println!("=======================================\n");

    let mut accelerator = KeyRepeatAccelerator::new();

    println!("Sustained fast-forward (one call per debounced burst):");
    for count in 1..=8 {
        let speed = accelerator.compute_speed(count, Direction::Forward);
        println!("  count {:>2} -> speed {:>3}", count, speed);
    }

    println!("\nUser reverses to rewind mid-burst:");
    for count in [-2, -3, -4] {
        let speed = accelerator.compute_speed(count, Direction::Rewind);
        println!("  count {:>2} -> speed {:>3}", count, speed);
    }

    println!("\nA fresh single press is always normal speed:");
    println!("  count  1 -> speed {:>3}", accelerator.compute_speed(1, Direction::Forward));
}
