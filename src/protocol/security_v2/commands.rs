//! Host command identifiers.
//!
//! Board-specific commands live above `HOTH_CMD_BOARD_SPECIFIC_BASE`; the
//! security v2 command then selects a handler with a (major, minor) pair
//! carried in the request header.

pub const HOTH_CMD_BOARD_SPECIFIC_BASE: u16 = 0x3E00;

pub const HOTH_PRV_CMD_HOTH_SECURITY_V2: u16 = 0x0044;
pub const HOTH_PRV_CMD_HOTH_PROVISIONING_LOG: u16 = 0x0049;

/// Major command shared by every token query.
pub const TOKENS_MAJOR_COMMAND: u8 = 0x03;

/// Map a board-private command number into the host command space.
#[must_use]
pub const fn hoth_base_cmd(command: u16) -> u16 {
    HOTH_CMD_BOARD_SPECIFIC_BASE + command
}

/// Full address of one security v2 handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandCode {
    pub base: u16,
    pub major: u8,
    pub minor: u8,
}

impl CommandCode {
    #[must_use]
    pub const fn security_v2(major: u8, minor: u8) -> Self {
        Self {
            base: hoth_base_cmd(HOTH_PRV_CMD_HOTH_SECURITY_V2),
            major,
            minor,
        }
    }
}

impl std::fmt::Display for CommandCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#06x}/{}.{}", self.base, self.major, self.minor)
    }
}

/// Minor commands under [`TOKENS_MAJOR_COMMAND`].
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenCommand {
    GetTokenSetCount = 0,
    GetTokenSetInfo = 1,
    GetTokensInSet = 2,
}

impl TokenCommand {
    #[must_use]
    pub const fn code(self) -> CommandCode {
        CommandCode::security_v2(TOKENS_MAJOR_COMMAND, self as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_minors_share_base_and_major() {
        let count = TokenCommand::GetTokenSetCount.code();
        let info = TokenCommand::GetTokenSetInfo.code();
        let list = TokenCommand::GetTokensInSet.code();
        assert_eq!(count.base, 0x3E00 + HOTH_PRV_CMD_HOTH_SECURITY_V2);
        assert_eq!((count.major, count.minor), (TOKENS_MAJOR_COMMAND, 0));
        assert_eq!((info.base, info.minor), (count.base, 1));
        assert_eq!((list.base, list.minor), (count.base, 2));
    }

    #[test]
    fn display_is_compact() {
        let code = CommandCode {
            base: 0x3E44,
            major: 3,
            minor: 1,
        };
        assert_eq!(code.to_string(), "0x3e44/3.1");
    }
}
