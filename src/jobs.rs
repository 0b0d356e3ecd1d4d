pub mod trial_reminder;
