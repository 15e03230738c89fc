//! Small bitfields carried on messages and guilds

use bitflags::bitflags;

bitflags! {
    /// Message flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MessageFlags: u64 {
        /// This message has been published to subscribed channels
        const CROSSPOSTED            = 1 << 0;
        /// This message originated from a message in another channel
        const IS_CROSSPOST           = 1 << 1;
        /// Do not include embeds when serializing this message
        const SUPPRESS_EMBEDS        = 1 << 2;
        /// The source message for this crosspost has been deleted
        const SOURCE_MESSAGE_DELETED = 1 << 3;
        /// This message came from the urgent message system
        const URGENT                 = 1 << 4;
    }
}

bitflags! {
    /// Guild system channel flags
    ///
    /// A set bit suppresses the corresponding notice in the system channel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SystemChannelFlags: u64 {
        /// Member join notices
        const USER_JOIN            = 1 << 0;
        /// Server boost notices
        const PREMIUM_SUBSCRIPTION = 1 << 1;
    }
}
