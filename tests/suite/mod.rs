mod concurrency;
mod golden;
mod properties;
mod scenarios;
