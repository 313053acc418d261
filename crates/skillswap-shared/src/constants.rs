/// Application name
pub const APP_NAME: &str = "SkillSwap";

/// Storage keys of the four record collections
pub const USERS_KEY: &str = "skillswap_users";
pub const SKILLS_KEY: &str = "skillswap_skills";
pub const MESSAGES_KEY: &str = "skillswap_messages";
pub const CONVERSATIONS_KEY: &str = "skillswap_conversations";

/// Storage key of the persisted "last logged-in user" record
pub const CURRENT_USER_KEY: &str = "skillswap_currentUser";

/// Avatar assigned to new accounts
pub const DEFAULT_AVATAR_URL: &str =
    "https://cdn.pixabay.com/photo/2015/10/05/22/37/blank-profile-picture-973460_960_720.png";

/// Maximum number of users returned by the matcher
pub const MAX_MATCHES: usize = 6;

/// Salt size in bytes for credential hashes
pub const CREDENTIAL_SALT_SIZE: usize = 16;

/// Prefix marking a hashed credential
pub const CREDENTIAL_SCHEME: &str = "blake3";

/// Key derivation context (BLAKE3)
pub const KDF_CONTEXT_CREDENTIAL: &str = "skillswap-credential-v1";
