use super::{RouteMethod, RouteSpec};

/// Forwarding rules for the clinic front end's `/api` namespace.
///
/// Login, registration and both password-reset steps are the only public
/// routes; everything else needs a credential.
pub fn clinic_routes() -> Vec<RouteSpec> {
    use RouteMethod::{Delete, Get, Post, Put};

    vec![
        // Auth
        RouteSpec::new("login", Post, "/api/auth/login")
            .public()
            .with_body()
            .default_error("Login failed"),
        RouteSpec::new("register", Post, "/api/auth/register")
            .public()
            .with_body()
            .default_error("Registration failed"),
        RouteSpec::new("forgot_password", Post, "/api/auth/forgot-password")
            .public()
            .with_body()
            .default_error("Failed to request password reset"),
        RouteSpec::new("reset_password", Post, "/api/auth/reset-password")
            .public()
            .with_body()
            .default_error("Failed to reset password"),
        RouteSpec::new("current_user", Get, "/api/auth/me")
            .default_error("Failed to fetch profile"),
        RouteSpec::new("update_profile", Put, "/api/auth/me")
            .with_body()
            .default_error("Failed to update profile"),
        // Patients
        RouteSpec::new("list_patients", Get, "/api/patients")
            .default_error("Failed to fetch patients"),
        RouteSpec::new("create_patient", Post, "/api/patients")
            .with_body()
            .default_error("Failed to create patient"),
        RouteSpec::new("get_patient", Get, "/api/patients/{id}")
            .default_error("Failed to fetch patient"),
        RouteSpec::new("update_patient", Put, "/api/patients/{id}")
            .with_body()
            .default_error("Failed to update patient"),
        RouteSpec::new("delete_patient", Delete, "/api/patients/{id}")
            .default_error("Failed to delete patient"),
        RouteSpec::new("patient_prescriptions", Get, "/api/patients/{id}/prescriptions")
            .default_error("Failed to fetch prescriptions"),
        // Doctors
        RouteSpec::new("list_doctors", Get, "/api/doctors")
            .default_error("Failed to fetch doctors"),
        RouteSpec::new("get_doctor", Get, "/api/doctors/{id}")
            .default_error("Failed to fetch doctor"),
        // Appointments
        RouteSpec::new("list_appointments", Get, "/api/appointments")
            .default_error("Failed to fetch appointments"),
        RouteSpec::new("create_appointment", Post, "/api/appointments")
            .with_body()
            .default_error("Failed to create appointment"),
        RouteSpec::new("appointments_in_range", Get, "/api/appointments/range")
            .require_query(&["start", "end"])
            .default_error("Failed to fetch appointments"),
        RouteSpec::new("appointments_by_status", Get, "/api/appointments/status/{status}")
            .default_error("Failed to fetch appointments"),
        RouteSpec::new("get_appointment", Get, "/api/appointments/{id}")
            .default_error("Failed to fetch appointment"),
        RouteSpec::new("update_appointment", Put, "/api/appointments/{id}")
            .with_body()
            .default_error("Failed to update appointment"),
        RouteSpec::new("delete_appointment", Delete, "/api/appointments/{id}")
            .default_error("Failed to delete appointment"),
        // Admissions
        RouteSpec::new("list_admissions", Get, "/api/admissions")
            .default_error("Failed to fetch admissions"),
        RouteSpec::new("create_admission", Post, "/api/admissions")
            .with_body()
            .default_error("Failed to admit patient"),
        RouteSpec::new("get_admission", Get, "/api/admissions/{id}")
            .default_error("Failed to fetch admission"),
        RouteSpec::new("discharge_admission", Put, "/api/admissions/{id}/discharge")
            .with_body()
            .default_error("Failed to discharge patient"),
        // Rooms
        RouteSpec::new("list_rooms", Get, "/api/rooms")
            .default_error("Failed to fetch rooms"),
        RouteSpec::new("create_room", Post, "/api/rooms")
            .with_body()
            .default_error("Failed to create room"),
        RouteSpec::new("update_room", Put, "/api/rooms/{id}")
            .with_body()
            .default_error("Failed to update room"),
        RouteSpec::new("delete_room", Delete, "/api/rooms/{id}")
            .default_error("Failed to delete room"),
        // Prescriptions
        RouteSpec::new("create_prescription", Post, "/api/prescriptions")
            .with_body()
            .default_error("Failed to create prescription"),
        // Dashboard
        RouteSpec::new("dashboard_stats", Get, "/api/dashboard/stats")
            .default_error("Failed to fetch dashboard statistics"),
    ]
}
