use crate::cpu::instruction::{
    AluOperation, CompareBranchKind, Instruction, LoadStoreKind, Quantity, SecondOperand,
    ShiftKind,
};
use crate::cpu::condition::Condition;
use crate::cpu::flags::Flags;
use crate::cpu::state::{ArchState, SIZE_OF_INSTRUCTION};
use crate::memory::{self, Memory, Subword, SubwordAccess};

/// Everything one instruction may read or write.
///
/// `current` is never written. Every handler leaves its effect in `next`,
/// in `memory`, or (for `HLT`) in `running`.
pub struct Executor<'a, M: Memory + ?Sized> {
    pub current: &'a ArchState,
    pub next: &'a mut ArchState,
    pub memory: &'a mut M,
    pub running: &'a mut bool,
    pub subword_access: SubwordAccess,
}

impl<M: Memory + ?Sized> Executor<'_, M> {
    pub fn execute(&mut self, instruction: Instruction) {
        match instruction {
            Instruction::DataProcessing {
                alu_instruction,
                set_flags,
                destination,
                rn,
                op2,
            } => self.data_processing(alu_instruction, set_flags, destination, rn, op2),
            Instruction::Multiply {
                rd,
                rn,
                rm,
                ra,
                subtract,
            } => self.multiply(rd, rn, rm, ra, subtract),
            Instruction::Halt => self.halt(),
            Instruction::Branch { offset } => self.branch_relative(offset),
            Instruction::BranchRegister { rn } => self.branch_register(rn),
            Instruction::BranchConditional { condition, offset } => {
                self.branch_conditional(condition, offset);
            }
            Instruction::CompareAndBranch { kind, rt, offset } => {
                self.compare_and_branch(kind, rt, offset);
            }
            Instruction::MoveWide { rd, immediate } => self.move_wide(rd, immediate),
            Instruction::ShiftImmediate {
                kind,
                rd,
                rn,
                amount,
            } => self.shift_immediate(kind, rd, rn, amount),
            Instruction::SingleDataTransfer {
                kind,
                quantity,
                rt,
                base_register,
                offset,
            } => self.single_data_transfer(kind, quantity, rt, base_register, offset),
        }
    }

    fn register(&self, reg: usize) -> u64 {
        self.current.registers.register_at(reg)
    }

    fn write_register(&mut self, reg: usize, value: u64) {
        self.next.registers.set_register_at(reg, value);
    }

    /// Falls through to the next instruction.
    fn advance_program_counter(&mut self) {
        self.next.set_program_counter(
            self.current
                .program_counter()
                .wrapping_add(SIZE_OF_INSTRUCTION),
        );
    }

    /// Writes `result` to `destination` (if any), sets N and Z from it and
    /// falls through.
    fn commit_result(&mut self, result: u64, destination: Option<usize>) {
        if let Some(rd) = destination {
            self.write_register(rd, result);
        }
        self.next.flags = Flags::from_result(result);
        self.advance_program_counter();
    }

    fn second_operand(&self, op2: SecondOperand) -> u64 {
        match op2 {
            SecondOperand::Immediate(value) => value,
            SecondOperand::ShiftedRegister { register, amount } => {
                self.register(register).wrapping_shl(amount)
            }
            SecondOperand::ExtendedRegister {
                register,
                extend,
                amount,
            } => extend.apply(self.register(register)).wrapping_shl(amount),
        }
    }

    fn data_processing(
        &mut self,
        alu_instruction: AluOperation,
        set_flags: bool,
        destination: Option<usize>,
        rn: usize,
        op2: SecondOperand,
    ) {
        let op1 = self.register(rn);
        let op2 = self.second_operand(op2);

        let result = match alu_instruction {
            AluOperation::Add => op1.wrapping_add(op2),
            AluOperation::Sub => op1.wrapping_sub(op2),
            AluOperation::And => op1 & op2,
            AluOperation::Eor => op1 ^ op2,
            AluOperation::Orr => op1 | op2,
        };

        if set_flags {
            self.commit_result(result, destination);
        } else {
            if let Some(rd) = destination {
                self.write_register(rd, result);
            }
            self.advance_program_counter();
        }
    }

    fn multiply(&mut self, rd: usize, rn: usize, rm: usize, ra: usize, subtract: bool) {
        let accumulator = self.register(ra);
        let product = self.register(rn).wrapping_mul(self.register(rm));
        let result = if subtract {
            accumulator.wrapping_sub(product)
        } else {
            accumulator.wrapping_add(product)
        };
        self.write_register(rd, result);
        self.advance_program_counter();
    }

    fn halt(&mut self) {
        tracing::info!(
            "halt at 0x{:016X}, clearing run flag",
            self.current.program_counter()
        );
        *self.running = false;
    }

    fn branch_relative(&mut self, offset: i64) {
        self.next
            .branch_relative(self.current.program_counter(), offset);
    }

    fn branch_register(&mut self, rn: usize) {
        self.next.set_program_counter(self.register(rn));
    }

    fn branch_conditional(&mut self, condition: Condition, offset: i64) {
        if condition.holds(self.current.flags) {
            self.branch_relative(offset);
        } else {
            self.advance_program_counter();
        }
    }

    fn compare_and_branch(&mut self, kind: CompareBranchKind, rt: usize, offset: i64) {
        let value = self.register(rt);
        let taken = match kind {
            CompareBranchKind::Zero => value == 0,
            CompareBranchKind::NonZero => value != 0,
        };

        if taken {
            self.branch_relative(offset);
        } else {
            self.advance_program_counter();
        }
    }

    fn move_wide(&mut self, rd: usize, immediate: u16) {
        self.write_register(rd, u64::from(immediate));
        self.advance_program_counter();
    }

    fn shift_immediate(&mut self, kind: ShiftKind, rd: usize, rn: usize, amount: u32) {
        let source = self.register(rn);
        let result = match kind {
            ShiftKind::Lsl => source.checked_shl(amount),
            ShiftKind::Lsr => source.checked_shr(amount),
        }
        .unwrap_or(0);

        self.write_register(rd, result);
        self.advance_program_counter();
    }

    #[allow(clippy::cast_possible_truncation)]
    fn single_data_transfer(
        &mut self,
        kind: LoadStoreKind,
        quantity: Quantity,
        rt: usize,
        base_register: usize,
        offset: i64,
    ) {
        let address = self.register(base_register).wrapping_add_signed(offset);
        let access = self.subword_access;

        match (kind, quantity) {
            (LoadStoreKind::Store, Quantity::Doubleword) => {
                let value = self.register(rt);
                self.memory.write_word(address, value as u32);
                self.memory
                    .write_word(address.wrapping_add(4), (value >> 32) as u32);
            }
            (LoadStoreKind::Store, Quantity::Halfword) => {
                let value = self.register(rt) as u32;
                memory::store_subword(
                    &mut *self.memory,
                    address,
                    value,
                    Subword::Halfword,
                    access,
                );
            }
            (LoadStoreKind::Store, Quantity::Byte) => {
                let value = self.register(rt) as u32;
                memory::store_subword(
                    &mut *self.memory,
                    address,
                    value,
                    Subword::Byte,
                    access,
                );
            }
            (LoadStoreKind::Load, Quantity::Doubleword) => {
                let low = self.memory.read_word(address);
                let high = self.memory.read_word(address.wrapping_add(4));
                self.write_register(rt, (u64::from(high) << 32) | u64::from(low));
            }
            (LoadStoreKind::Load, Quantity::Halfword) => {
                let value =
                    memory::load_subword(&*self.memory, address, Subword::Halfword, access);
                self.write_register(rt, u64::from(value));
            }
            (LoadStoreKind::Load, Quantity::Byte) => {
                let value =
                    memory::load_subword(&*self.memory, address, Subword::Byte, access);
                self.write_register(rt, u64::from(value));
            }
        }

        self.advance_program_counter();
    }
}
