mod property;
mod store;
