// User profiles: public profile page data, view recording, follows.

pub mod handlers;
