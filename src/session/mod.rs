pub(crate) mod race_session;
