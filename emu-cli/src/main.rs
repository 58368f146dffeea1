use clap::Parser;

use genesis::{Emulator, Step};

/// Mega Drive emulator
#[derive(Parser)]
struct Args {
    /// ROM image to execute
    rom: String,

    /// Stop after this many instructions.
    #[arg(long)]
    steps: Option<u64>,

    /// Print each instruction before executing it.
    #[arg(long)]
    trace: bool,
}

fn main() {
    env_logger::init();

    let opt = Args::parse();

    let rom = std::fs::read(&opt.rom).unwrap();
    let mut emu = Emulator::new(rom).unwrap();
    println!(
        "loaded \"{}\" ({})",
        emu.rom_header().metadata.overseas_title,
        emu.rom_header().metadata.serial_number
    );

    let mut executed = 0u64;
    loop {
        if opt.steps.is_some_and(|quota| executed >= quota) {
            break;
        }

        if opt.trace {
            match emu.current_instruction() {
                Ok(info) => println!("{:06x}: {}", info.pc, info.description),
                Err(err) => {
                    eprintln!("decode error: {err}");
                    break;
                }
            }
        }

        match emu.step() {
            Ok(Step::Executed) => executed += 1,
            Ok(Step::VblankInterrupt) => {}
            Err(err) => {
                eprintln!("stopped: {err}");
                break;
            }
        }
    }

    print!("{}", emu.registers().dump());
}
