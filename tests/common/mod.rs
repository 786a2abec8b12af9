use dotmatrix::cpu::Cpu;
use dotmatrix::FlatMemory;

/// Fresh core plus a flat bus with `program` mapped at the boot PC (0x0100).
pub fn machine_with_program(program: &[u8]) -> (Cpu, FlatMemory) {
    let mut memory = FlatMemory::new();
    memory.load(0x0100, program);
    let cpu = Cpu::new().expect("opcode table construction failed");
    (cpu, memory)
}

/// Steps until the core halts, returning total machine cycles. Panics if
/// the program has not halted within `max_steps`.
pub fn run_to_halt(cpu: &mut Cpu, memory: &mut FlatMemory, max_steps: u32) -> u64 {
    let mut elapsed: u64 = 0;
    for _ in 0..max_steps {
        if cpu.halted() {
            return elapsed;
        }
        elapsed += u64::from(cpu.step(memory).expect("step failed"));
    }
    panic!("program did not halt within {} steps", max_steps);
}
