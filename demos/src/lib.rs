//! Program builders shared by the demo binaries. Each builder calls
//! [`isa::encode_word`] directly, the same function `vasm` calls from its
//! instruction encoder, so a demo image and an assembled one agree on the
//! wire format without the demo going through the assembler at all.

use isa::{encode_word, AddressingMode, Opcode, RegisterId};

fn word(opcode: Opcode, mode: AddressingMode, reg1: RegisterId, reg2: RegisterId, immediate: u32) -> u32 {
    encode_word(opcode, mode, reg1.index(), reg2.index(), immediate)
}

fn load_imm(reg: RegisterId, value: u32) -> u32 {
    word(Opcode::LOAD, AddressingMode::Imm, reg, RegisterId::from_index(0), value)
}

fn move_reg(dst: RegisterId, src: RegisterId) -> u32 {
    word(Opcode::MOVE, AddressingMode::Reg, dst, src, 0)
}

fn add_reg(dst: RegisterId, src: RegisterId) -> u32 {
    word(Opcode::ADD, AddressingMode::Reg, dst, src, 0)
}

fn sub_reg(dst: RegisterId, src: RegisterId) -> u32 {
    word(Opcode::SUB, AddressingMode::Reg, dst, src, 0)
}

fn syscall(code: u32) -> u32 {
    word(Opcode::SYSCALL, AddressingMode::Imm, RegisterId::from_index(0), RegisterId::from_index(0), code)
}

fn halt() -> u32 {
    word(Opcode::HALT, AddressingMode::Imm, RegisterId::from_index(0), RegisterId::from_index(0), 0)
}

/// Builds a program that prints `count` Fibonacci numbers, one per line,
/// using `R5`/`R6` as the running pair and `R9` as the down-counter. Each
/// `u32` is a single already-encoded instruction word.
pub fn fibonacci_program(count: u32) -> Vec<u32> {
    let acc = RegisterId::ACC;
    let r5 = RegisterId::from_index(5);
    let r6 = RegisterId::from_index(6);
    let r8 = RegisterId::from_index(8);
    let r9 = RegisterId::from_index(9);

    let mut program = Vec::new();

    program.push(load_imm(r5, 0));
    program.push(load_imm(r6, 1));
    program.push(load_imm(r9, count));

    let loop_start = (program.len() as u32) * 4;

    program.push(move_reg(acc, r5));
    program.push(syscall(1)); // print integer
    program.push(load_imm(acc, 10)); // '\n'
    program.push(syscall(0)); // print char

    program.push(load_imm(acc, 0));
    program.push(add_reg(acc, r5));
    program.push(add_reg(acc, r6));

    program.push(move_reg(r5, r6));
    program.push(move_reg(r6, acc));

    program.push(load_imm(r8, 1));
    program.push(sub_reg(r9, r8));

    program.push(word(Opcode::JNZ, AddressingMode::Imm, RegisterId::from_index(0), RegisterId::from_index(0), loop_start));
    program.push(halt());

    program
}

/// Builds a program that exercises the console-output syscalls by
/// printing `message` one character at a time, then halting.
pub fn syscall_demo_program(message: &str) -> Vec<u32> {
    let acc = RegisterId::ACC;
    let mut program = Vec::new();

    for byte in message.bytes() {
        program.push(load_imm(acc, byte as u32));
        program.push(syscall(0));
    }
    program.push(load_imm(acc, 10));
    program.push(syscall(0));
    program.push(halt());

    program
}

pub fn words_to_bytes(words: &[u32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(words.len() * 4);
    for word in words {
        bytes.extend_from_slice(&word.to_le_bytes());
    }
    bytes
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fibonacci_program_starts_by_seeding_the_running_pair() {
        let program = fibonacci_program(10);
        assert_eq!(program[0], load_imm(RegisterId::from_index(5), 0));
        assert_eq!(program[1], load_imm(RegisterId::from_index(6), 1));
    }

    #[test]
    fn fibonacci_program_ends_with_halt() {
        let program = fibonacci_program(5);
        assert_eq!(*program.last().unwrap(), halt());
    }

    #[test]
    fn syscall_demo_emits_one_load_syscall_pair_per_character() {
        let program = syscall_demo_program("hi");
        // 2 chars * 2 words, plus newline pair, plus halt.
        assert_eq!(program.len(), 2 * 2 + 2 + 1);
    }

    #[test]
    fn words_to_bytes_is_little_endian() {
        let bytes = words_to_bytes(&[0x0105_1234]);
        assert_eq!(bytes, vec![0x34, 0x12, 0x05, 0x01]);
    }
}
