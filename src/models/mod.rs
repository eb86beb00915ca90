pub mod referencemodel;
pub mod transactionmodel;
pub mod usermodel;
