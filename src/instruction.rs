/// # instruction
///
/// Every CHIP-8 instruction is one big-endian 16 bit word. The top nibble picks
/// the family; some families use the low nibble or low byte to pick the
/// operation within the family. Fields are named by position:
///
///   X    bits 8-11   register index
///   Y    bits 4-7    register index
///   N    bits 0-3    4 bit immediate
///   NN   bits 0-7    8 bit immediate
///   NNN  bits 0-11   12 bit address
///
/// Decoding is pure; nothing here touches VM state.
use crate::error::Chip8Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    ClearScreen,
    /// 00EE
    Return,
    /// 1NNN
    Jump { nnn: u16 },
    /// 2NNN
    Call { nnn: u16 },
    /// 3XNN
    SkipIfEqual { x: u8, nn: u8 },
    /// 4XNN
    SkipIfNotEqual { x: u8, nn: u8 },
    /// 5XY0
    SkipIfRegistersEqual { x: u8, y: u8 },
    /// 6XNN
    Load { x: u8, nn: u8 },
    /// 7XNN, no carry
    Add { x: u8, nn: u8 },
    /// 8XY0
    Copy { x: u8, y: u8 },
    /// 8XY1
    Or { x: u8, y: u8 },
    /// 8XY2
    And { x: u8, y: u8 },
    /// 8XY3
    Xor { x: u8, y: u8 },
    /// 8XY4, VF = carry
    AddRegisters { x: u8, y: u8 },
    /// 8XY5, VF = not borrow
    Subtract { x: u8, y: u8 },
    /// 8XY6, VF = bit shifted out
    ShiftRight { x: u8 },
    /// 8XY7, VF = not borrow
    SubtractReversed { x: u8, y: u8 },
    /// 8XYE, VF = bit shifted out
    ShiftLeft { x: u8 },
    /// 9XY0
    SkipIfRegistersNotEqual { x: u8, y: u8 },
    /// ANNN
    SetIndex { nnn: u16 },
    /// BNNN
    JumpOffset { nnn: u16 },
    /// CXNN
    Random { x: u8, nn: u8 },
    /// DXYN
    Draw { x: u8, y: u8, n: u8 },
    /// EX9E
    SkipIfKeyPressed { x: u8 },
    /// EXA1
    SkipIfKeyNotPressed { x: u8 },
    /// FX07
    ReadDelayTimer { x: u8 },
    /// FX0A
    WaitForKey { x: u8 },
    /// FX15
    SetDelayTimer { x: u8 },
    /// FX18
    SetSoundTimer { x: u8 },
    /// FX1E
    AddToIndex { x: u8 },
    /// FX29
    FontGlyph { x: u8 },
    /// FX33
    StoreBcd { x: u8 },
    /// FX55
    DumpRegisters { x: u8 },
    /// FX65
    LoadRegisters { x: u8 },
}

impl Instruction {
    /// decode an instruction word, or report it as unknown
    pub fn decode(word: u16) -> Result<Instruction, Chip8Error> {
        let x = ((word & 0x0F00) >> 8) as u8;
        let y = ((word & 0x00F0) >> 4) as u8;
        let n = (word & 0x000F) as u8;
        let nn = (word & 0x00FF) as u8;
        let nnn = word & 0x0FFF;

        use Instruction::*;
        let instruction = match (word & 0xF000) >> 12 {
            0x0 => match word {
                0x00E0 => ClearScreen,
                0x00EE => Return,
                _ => return Err(Chip8Error::UnknownInstruction { opcode: word }),
            },
            0x1 => Jump { nnn },
            0x2 => Call { nnn },
            0x3 => SkipIfEqual { x, nn },
            0x4 => SkipIfNotEqual { x, nn },
            0x5 if n == 0 => SkipIfRegistersEqual { x, y },
            0x6 => Load { x, nn },
            0x7 => Add { x, nn },
            0x8 => match n {
                0x0 => Copy { x, y },
                0x1 => Or { x, y },
                0x2 => And { x, y },
                0x3 => Xor { x, y },
                0x4 => AddRegisters { x, y },
                0x5 => Subtract { x, y },
                0x6 => ShiftRight { x },
                0x7 => SubtractReversed { x, y },
                0xE => ShiftLeft { x },
                _ => return Err(Chip8Error::UnknownInstruction { opcode: word }),
            },
            0x9 if n == 0 => SkipIfRegistersNotEqual { x, y },
            0xA => SetIndex { nnn },
            0xB => JumpOffset { nnn },
            0xC => Random { x, nn },
            0xD => Draw { x, y, n },
            0xE => match nn {
                0x9E => SkipIfKeyPressed { x },
                0xA1 => SkipIfKeyNotPressed { x },
                _ => return Err(Chip8Error::UnknownInstruction { opcode: word }),
            },
            0xF => match nn {
                0x07 => ReadDelayTimer { x },
                0x0A => WaitForKey { x },
                0x15 => SetDelayTimer { x },
                0x18 => SetSoundTimer { x },
                0x1E => AddToIndex { x },
                0x29 => FontGlyph { x },
                0x33 => StoreBcd { x },
                0x55 => DumpRegisters { x },
                0x65 => LoadRegisters { x },
                _ => return Err(Chip8Error::UnknownInstruction { opcode: word }),
            },
            _ => return Err(Chip8Error::UnknownInstruction { opcode: word }),
        };
        Ok(instruction)
    }
}

#[cfg(test)]
mod tests {
    use super::Instruction::*;
    use super::*;

    fn decode_ok(word: u16) -> Instruction {
        match Instruction::decode(word) {
            Ok(i) => i,
            Err(e) => panic!("{:#06x} should decode: {}", word, e),
        }
    }

    fn is_unknown(word: u16) -> bool {
        matches!(
            Instruction::decode(word),
            Err(Chip8Error::UnknownInstruction { opcode }) if opcode == word
        )
    }

    #[test]
    fn test_decode_system() {
        assert_eq!(decode_ok(0x00E0), ClearScreen);
        assert_eq!(decode_ok(0x00EE), Return);
        assert!(is_unknown(0x0000));
        assert!(is_unknown(0x0123));
        assert!(is_unknown(0x00E1));
    }

    #[test]
    fn test_decode_fields() {
        assert_eq!(decode_ok(0x1abc), Jump { nnn: 0xabc });
        assert_eq!(decode_ok(0x2fff), Call { nnn: 0xfff });
        assert_eq!(decode_ok(0x3a42), SkipIfEqual { x: 0xa, nn: 0x42 });
        assert_eq!(decode_ok(0x4a42), SkipIfNotEqual { x: 0xa, nn: 0x42 });
        assert_eq!(decode_ok(0x5120), SkipIfRegistersEqual { x: 1, y: 2 });
        assert_eq!(decode_ok(0x6005), Load { x: 0, nn: 5 });
        assert_eq!(decode_ok(0x7eff), Add { x: 0xe, nn: 0xff });
        assert_eq!(decode_ok(0x9340), SkipIfRegistersNotEqual { x: 3, y: 4 });
        assert_eq!(decode_ok(0xa200), SetIndex { nnn: 0x200 });
        assert_eq!(decode_ok(0xb123), JumpOffset { nnn: 0x123 });
        assert_eq!(decode_ok(0xc70f), Random { x: 7, nn: 0x0f });
        assert_eq!(decode_ok(0xd125), Draw { x: 1, y: 2, n: 5 });
    }

    #[test]
    fn test_decode_alu() {
        assert_eq!(decode_ok(0x8120), Copy { x: 1, y: 2 });
        assert_eq!(decode_ok(0x8121), Or { x: 1, y: 2 });
        assert_eq!(decode_ok(0x8122), And { x: 1, y: 2 });
        assert_eq!(decode_ok(0x8123), Xor { x: 1, y: 2 });
        assert_eq!(decode_ok(0x8124), AddRegisters { x: 1, y: 2 });
        assert_eq!(decode_ok(0x8125), Subtract { x: 1, y: 2 });
        assert_eq!(decode_ok(0x8126), ShiftRight { x: 1 });
        assert_eq!(decode_ok(0x8127), SubtractReversed { x: 1, y: 2 });
        assert_eq!(decode_ok(0x812e), ShiftLeft { x: 1 });
        for n in [0x8, 0x9, 0xa, 0xb, 0xc, 0xd, 0xf] {
            assert!(is_unknown(0x8120 | n));
        }
    }

    #[test]
    fn test_decode_low_nibble_must_be_zero() {
        assert!(is_unknown(0x5121));
        assert!(is_unknown(0x912f));
    }

    #[test]
    fn test_decode_keys_and_timers() {
        assert_eq!(decode_ok(0xe59e), SkipIfKeyPressed { x: 5 });
        assert_eq!(decode_ok(0xe5a1), SkipIfKeyNotPressed { x: 5 });
        assert!(is_unknown(0xe5a2));
        assert_eq!(decode_ok(0xf307), ReadDelayTimer { x: 3 });
        assert_eq!(decode_ok(0xf30a), WaitForKey { x: 3 });
        assert_eq!(decode_ok(0xf315), SetDelayTimer { x: 3 });
        assert_eq!(decode_ok(0xf318), SetSoundTimer { x: 3 });
        assert_eq!(decode_ok(0xf31e), AddToIndex { x: 3 });
        assert_eq!(decode_ok(0xf329), FontGlyph { x: 3 });
        assert_eq!(decode_ok(0xf333), StoreBcd { x: 3 });
        assert_eq!(decode_ok(0xf355), DumpRegisters { x: 3 });
        assert_eq!(decode_ok(0xf365), LoadRegisters { x: 3 });
        assert!(is_unknown(0xf300));
        assert!(is_unknown(0xf375));
    }

    #[test]
    fn test_decode_is_total() {
        // every word either decodes or is reported with its own value
        for word in 0..=u16::MAX {
            match Instruction::decode(word) {
                Ok(_) => {}
                Err(Chip8Error::UnknownInstruction { opcode }) => assert_eq!(opcode, word),
                Err(e) => panic!("unexpected error {}", e),
            }
        }
    }
}
