//! AS108M instruction set
//!
//! Instruction codes from the AS108M command manual. The instruction byte is
//! the first payload byte of every command frame; parameters follow it.

use std::fmt;

/// Protocol instruction codes
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Instruction {
    /// Capture a fingerprint image into the image buffer
    GetImage = 0x01,
    /// Generate a feature from the image buffer into a char buffer
    GetChar = 0x02,
    /// Match char buffer 1 against char buffer 2
    Match = 0x03,
    /// Search the template database for char buffer 1
    Search = 0x04,
    /// Merge char buffers into a template model
    RegModel = 0x05,
    /// Store the template model at a database page
    StoreChar = 0x06,
    /// Load a stored template into a char buffer
    LoadChar = 0x07,
    /// Upload a char buffer to the host
    UpChar = 0x08,
    /// Download a char buffer from the host
    DownChar = 0x09,
    /// Upload the image buffer to the host
    UpImage = 0x0A,
    /// Download an image from the host
    DownImage = 0x0B,
    /// Delete templates starting at a database page
    DeleteChar = 0x0C,
    /// Clear the whole template database
    Empty = 0x0D,
    /// Write a system register
    WriteReg = 0x0E,
    /// Read the system parameter block
    ReadSysParameter = 0x0F,
    /// Set the device password
    SetPassword = 0x12,
    /// Verify the device password
    VerifyPassword = 0x13,
    /// Request a random code
    GetRandomCode = 0x14,
    /// Rewrite the device address
    SetChipAddress = 0x15,
    /// Read the information page
    ReadInfoPage = 0x16,
    /// Write a notepad page
    WriteNotepad = 0x18,
    /// Read a notepad page
    ReadNotepad = 0x19,
    /// Count valid templates
    ValidTemplateNum = 0x1D,
    /// Read the template index table
    ReadIndexTable = 0x1F,
    /// Cancel the current operation
    Cancel = 0x30,
}

impl Instruction {
    /// Get instruction name as in the command manual
    pub fn name(self) -> &'static str {
        match self {
            Self::GetImage => "PS_GetImage",
            Self::GetChar => "PS_GenChar",
            Self::Match => "PS_Match",
            Self::Search => "PS_Search",
            Self::RegModel => "PS_RegModel",
            Self::StoreChar => "PS_StoreChar",
            Self::LoadChar => "PS_LoadChar",
            Self::UpChar => "PS_UpChar",
            Self::DownChar => "PS_DownChar",
            Self::UpImage => "PS_UpImage",
            Self::DownImage => "PS_DownImage",
            Self::DeleteChar => "PS_DeletChar",
            Self::Empty => "PS_Empty",
            Self::WriteReg => "PS_WriteReg",
            Self::ReadSysParameter => "PS_ReadSysPara",
            Self::SetPassword => "PS_SetPwd",
            Self::VerifyPassword => "PS_VfyPwd",
            Self::GetRandomCode => "PS_GetRandomCode",
            Self::SetChipAddress => "PS_SetChipAddr",
            Self::ReadInfoPage => "PS_ReadINFpage",
            Self::WriteNotepad => "PS_WriteNotepad",
            Self::ReadNotepad => "PS_ReadNotepad",
            Self::ValidTemplateNum => "PS_ValidTempleteNum",
            Self::ReadIndexTable => "PS_ReadIndexTable",
            Self::Cancel => "PS_Cancel",
        }
    }
}

impl From<Instruction> for u8 {
    fn from(instruction: Instruction) -> u8 {
        instruction as u8
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), *self as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_codes() {
        assert_eq!(u8::from(Instruction::GetImage), 0x01);
        assert_eq!(u8::from(Instruction::Search), 0x04);
        assert_eq!(u8::from(Instruction::Cancel), 0x30);
    }

    #[test]
    fn test_instruction_display() {
        assert_eq!(Instruction::GetImage.to_string(), "PS_GetImage(0x01)");
    }
}
