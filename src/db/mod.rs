pub mod dashboarddb;
pub mod db;
pub mod referencedb;
pub mod settlementdb;
pub mod userdb;
