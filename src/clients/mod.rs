pub mod supabase_client;

pub use supabase_client::SupabaseClient;
