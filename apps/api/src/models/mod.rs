pub mod keyword;
pub mod profile;

pub use keyword::{Keyword, KeywordOwner};
pub use profile::{NewProfile, Profile, UserInfo, UserType};
