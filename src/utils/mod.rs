pub mod code_generator;
pub mod decimal;
pub mod password;
pub mod token;
pub mod transaction_id;
