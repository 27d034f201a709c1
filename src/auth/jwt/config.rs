// 30 minutes
pub const JWT_EXP: u64 = 1800;
