pub mod clerk_client;
