use criterion::{black_box, criterion_group, criterion_main, Criterion};

use dotmatrix::cpu::Cpu;
use dotmatrix::FlatMemory;

fn repeat_opcode(c: &mut Criterion, name: &str, opcode: u8) {
    let mut cpu = Cpu::new().unwrap();
    let mut memory = FlatMemory::new();

    c.bench_function(name, |b| {
        b.iter(|| cpu.execute(&mut memory, black_box(opcode)))
    });
}

fn repeat_nop(c: &mut Criterion) {
    repeat_opcode(c, "nop", 0x00);
}

fn repeat_ld_b_c(c: &mut Criterion) {
    repeat_opcode(c, "ld-b-c", 0x41);
}

fn bench_step_loop(c: &mut Criterion) {
    let mut cpu = Cpu::new().unwrap();
    let mut memory = FlatMemory::new();
    // JP 0x0100 at the boot PC: a tight fetch loop.
    memory.load(0x0100, &[0xC3, 0x00, 0x01]);

    c.bench_function("step jp loop", |b| {
        b.iter(|| black_box(cpu.step(&mut memory)))
    });
}

criterion_group!(cpu_benches, repeat_nop, repeat_ld_b_c, bench_step_loop);
criterion_main!(cpu_benches);
