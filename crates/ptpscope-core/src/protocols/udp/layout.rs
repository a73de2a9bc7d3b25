/// PTP event messages (Sync, Delay_Req, Pdelay_*).
pub const PTP_EVENT_PORT: u16 = 319;
/// PTP general messages (Follow_Up, Delay_Resp, Announce, ...).
pub const PTP_GENERAL_PORT: u16 = 320;
