use clap::Parser;
use log::info;

use dotmatrix::cpu::Cpu;
use dotmatrix::{Error, FlatMemory, Rom};

/// Load a ROM image and drive the CPU core until it halts.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to .gb rom file
    #[arg(short = 'r', long = "rom", required = true)]
    rom_path: String,

    /// Stop after this many instruction steps
    #[arg(short, long)]
    steps: Option<u64>,
}

fn main() -> dotmatrix::Result<()> {
    env_logger::init();

    let args = Args::parse();

    let rom = Rom::from_file(&args.rom_path)?;
    info!("loaded rom \"{}\" ({} bytes)", rom.title(), rom.len());

    let mut memory = FlatMemory::new();
    rom.map_into(&mut memory);

    let mut cpu = Cpu::new()?;
    let mut elapsed_cycles: u64 = 0;
    let mut steps: u64 = 0;

    while !cpu.halted() {
        match cpu.step(&mut memory) {
            Ok(cycles) => elapsed_cycles += u64::from(cycles),
            Err(Error::IllegalOpcode { opcode, pc }) => {
                eprintln!("stopped: illegal opcode {:#04x} at {:#06x}", opcode, pc);
                break;
            }
            Err(e) => return Err(e),
        }
        steps += 1;
        if args.steps.is_some_and(|limit| steps >= limit) {
            break;
        }
    }

    println!("{} steps, {} machine cycles", steps, elapsed_cycles);
    println!("{}", cpu.debug_info());

    Ok(())
}
